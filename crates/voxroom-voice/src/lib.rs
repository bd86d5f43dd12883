//! Media session seam for the voxroom client.
//!
//! Audio transport, codec negotiation and voice-activity detection belong to
//! the real-time media SDK. This crate only describes what the client asks
//! for when it joins a room ([`RoomOptions`]), the handle it holds while the
//! room is mounted ([`MediaSession`]), and the declarative events the SDK
//! binding pushes back ([`MediaEvent`]).
//!
//! A [`MediaConnector`] turns options into a session. The client is generic
//! over the connector so the SDK binding can be swapped without touching
//! application state.

pub mod config;
pub mod connector;
pub mod error;
pub mod session;

pub use config::MediaConfig;
pub use connector::{LiveKitConnector, MediaConnector};
pub use error::VoiceError;
pub use session::{MediaEvent, MediaEventSender, MediaSession, RoomOptions};
