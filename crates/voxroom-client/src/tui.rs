//! Terminal front-end: draws the app and turns key presses into actions.

use crate::app::{App, AppEvent, Screen};
use crate::chat::{ChatPhase, ChatScreen};
use crate::connect::ConnectScreen;
use crate::panel::{PanelView, EMPTY_DOCUMENTS, EMPTY_TRANSCRIPT};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;
use voxroom_types::Speaker;
use voxroom_voice::MediaConnector;

/// How often the idle pulse advances.
const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// How long the input thread waits for a key before checking for shutdown.
const INPUT_POLL: Duration = Duration::from_millis(100);

const PULSE_FRAMES: &[&str] = &["(  ●  )", "( (●) )", "(( ● ))", "( (●) )"];
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Runs the UI until the user quits.
pub async fn run<C: MediaConnector>(
    mut app: App<C>,
    mut events: mpsc::UnboundedReceiver<AppEvent>,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_loop<C: MediaConnector>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<C>,
    events: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> io::Result<()> {
    let (key_tx, mut key_rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || read_keys(key_tx));

    let mut tick = tokio::time::interval(TICK_INTERVAL);
    let mut frame_no: u64 = 0;

    loop {
        terminal.draw(|f| render(f, app, frame_no))?;
        if app.should_quit() {
            return Ok(());
        }

        tokio::select! {
            key = key_rx.recv() => match key {
                Some(Ok(key)) => handle_key(app, key),
                Some(Err(e)) => return Err(e),
                None => return Ok(()),
            },
            Some(event) = events.recv() => app.handle(event),
            _ = tick.tick() => frame_no = frame_no.wrapping_add(1),
        }
    }
}

/// Reads terminal key events on a dedicated thread until the UI goes away.
fn read_keys(tx: mpsc::UnboundedSender<io::Result<KeyEvent>>) {
    loop {
        match event::poll(INPUT_POLL) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => {
                    if tx.send(Ok(key)).is_err() {
                        return;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    let _ = tx.send(Err(e));
                    return;
                }
            },
            Ok(false) => {
                if tx.is_closed() {
                    return;
                }
            }
            Err(e) => {
                let _ = tx.send(Err(e));
                return;
            }
        }
    }
}

/// Maps a key press onto the current screen.
pub fn handle_key<C: MediaConnector>(app: &mut App<C>, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    let Some((has_alert, live)) = app.chat().map(|chat| (chat.alert().is_some(), chat.is_live()))
    else {
        match key.code {
            KeyCode::Char(c) => app.connect_screen_mut().push_char(c),
            KeyCode::Backspace => app.connect_screen_mut().backspace(),
            KeyCode::Enter => {
                app.join();
            }
            KeyCode::Esc => app.quit(),
            _ => {}
        }
        return;
    };

    if has_alert {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            app.dismiss_alert();
        }
        return;
    }
    if key.code == KeyCode::Esc {
        app.disconnect();
        return;
    }
    if !live {
        return;
    }

    match key.code {
        KeyCode::Enter => {
            // Rejections are already shown in the upload panel.
            let _ = app.submit_upload();
        }
        KeyCode::Char(c) => {
            if let Some(chat) = app.chat_mut() {
                chat.upload_mut().push_char(c);
            }
        }
        KeyCode::Backspace => {
            if let Some(chat) = app.chat_mut() {
                chat.upload_mut().backspace();
            }
        }
        _ => {}
    }
}

/// Draws the whole app.
pub fn render<C: MediaConnector>(frame: &mut Frame, app: &App<C>, frame_no: u64) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            "Voice Assistant",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Powered by AI",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(title, header);

    match app.screen() {
        Screen::Connect => render_connect(frame, body, app.connect_screen()),
        Screen::Chat(chat) => render_chat(frame, body, chat, frame_no),
    }

    frame.render_widget(
        Paragraph::new("Real-time voice AI assistant")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        footer,
    );
}

fn render_connect(frame: &mut Frame, area: Rect, connect: &ConnectScreen) {
    let card = centered(area, 50, 12);
    let block = Block::bordered().title(" Start Voice Conversation ");
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let [description, input, button, info] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Length(2),
        Constraint::Min(1),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new("Connect to start talking with your AI assistant")
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        description,
    );

    let input_text = if connect.room_name().is_empty() {
        Span::styled("Enter room name", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(connect.room_name())
    };
    frame.render_widget(
        Paragraph::new(Line::from(input_text)).block(Block::bordered()),
        input,
    );

    let button_style = if connect.can_join() {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(
        Paragraph::new(Span::styled("[ Join Voice Chat ]", button_style))
            .alignment(Alignment::Center),
        button,
    );

    frame.render_widget(
        Paragraph::new("Your microphone will be activated after joining")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        info,
    );
}

fn render_chat(frame: &mut Frame, area: Rect, chat: &ChatScreen, frame_no: u64) {
    match chat.phase() {
        ChatPhase::Loading => {
            let spinner = SPINNER_FRAMES[(frame_no as usize) % SPINNER_FRAMES.len()];
            frame.render_widget(
                Paragraph::new(format!("{spinner} Connecting to voice assistant..."))
                    .alignment(Alignment::Center),
                centered(area, 50, 1),
            );
        }
        ChatPhase::Failed { .. } => {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from("Session unavailable"),
                    Line::from(Span::styled(
                        "Esc: back to room selection",
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
                .alignment(Alignment::Center),
                centered(area, 50, 2),
            );
        }
        ChatPhase::Live(_) => render_panel(frame, area, chat.panel(), frame_no),
    }

    if let Some(alert) = chat.alert() {
        render_alert(frame, area, alert);
    }
}

fn render_panel(frame: &mut Frame, area: Rect, panel: PanelView<'_>, frame_no: u64) {
    let [status_row, content, uploads, tips] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(6),
        Constraint::Length(8),
        Constraint::Length(1),
    ])
    .areas(area);

    let dot_style = if panel.activity.listening {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("● ", dot_style),
            Span::raw(panel.status_line()),
            Span::styled("   Esc: End Session", Style::default().fg(Color::DarkGray)),
        ])),
        status_row,
    );

    let [visualizer, transcript] =
        Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)])
            .areas(content);

    let (headline, subline) = panel.headline();
    let pulse = PULSE_FRAMES[(frame_no as usize) % PULSE_FRAMES.len()];
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(pulse, Style::default().fg(Color::Cyan))),
            Line::from(""),
            Line::from(Span::styled(
                headline,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(subline, Style::default().fg(Color::DarkGray))),
        ])
        .alignment(Alignment::Center)
        .block(Block::bordered()),
        visualizer,
    );

    let lines = panel.transcript_lines();
    let items: Vec<ListItem> = if lines.is_empty() {
        vec![ListItem::new(Span::styled(
            EMPTY_TRANSCRIPT,
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        lines
            .into_iter()
            .map(|line| {
                let color = match line.speaker {
                    Speaker::User => Color::Cyan,
                    Speaker::Assistant => Color::Magenta,
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", line.time), Style::default().fg(Color::DarkGray)),
                    Span::styled(format!("{}: ", line.label), Style::default().fg(color)),
                    Span::raw(line.text),
                ]))
            })
            .collect()
    };
    // Keep the newest lines in view.
    let visible = transcript.height.saturating_sub(2) as usize;
    let skip = items.len().saturating_sub(visible);
    frame.render_widget(
        List::new(items.into_iter().skip(skip)).block(Block::bordered().title(" Conversation ")),
        transcript,
    );

    let [documents, upload] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(uploads);

    let names = panel.document_names();
    let doc_items: Vec<ListItem> = if names.is_empty() {
        vec![ListItem::new(Span::styled(
            EMPTY_DOCUMENTS,
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        names.into_iter().map(ListItem::new).collect()
    };
    frame.render_widget(
        List::new(doc_items).block(Block::bordered().title(" Documents ")),
        documents,
    );

    let mut upload_lines = vec![
        Line::from(Span::styled(
            "Path to PDF, TXT, DOC, DOCX or MD (max 10 MB), Enter to upload",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(format!("> {}", panel.upload_prompt())),
    ];
    if let Some((message, is_error)) = panel.upload_message() {
        let color = if is_error { Color::Red } else { Color::Green };
        upload_lines.push(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(color),
        )));
    }
    frame.render_widget(
        Paragraph::new(upload_lines)
            .wrap(Wrap { trim: false })
            .block(Block::bordered().title(" Upload Document ")),
        upload,
    );

    frame.render_widget(
        Paragraph::new("Tips: Speak clearly and naturally.")
            .style(Style::default().fg(Color::DarkGray)),
        tips,
    );
}

fn render_alert(frame: &mut Frame, area: Rect, alert: &str) {
    let popup = centered(area, 60, 6);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(alert.to_string()),
            Line::from(""),
            Line::from(Span::styled(
                "Enter: OK",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(
            Block::bordered()
                .title(" Alert ")
                .border_style(Style::default().fg(Color::Red)),
        ),
        popup,
    );
}

/// A `width` x `height` rectangle centered in `area`, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
