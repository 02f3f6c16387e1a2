//! Terminal frontend: paints frames with ratatui and pumps keyboard input

use std::future::Future;
use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use futures::StreamExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Circle, Points};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::Config;
use crate::game::{Bounds, Key, SessionCommand, SessionHandle};

use super::frame::{build_frame, DrawCommand, SpriteKind};
use super::sprite::Assets;
use super::stars::Starfield;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// What a key event means to the frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press(Key),
    Release(Key),
    Restart,
    Quit,
}

fn game_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        _ => Key::Other,
    }
}

/// Classify a raw key event. Any release counts, since releasing any key
/// stops the ship.
pub fn classify(event: &KeyEvent) -> Option<KeyAction> {
    if event.kind == KeyEventKind::Release {
        return Some(KeyAction::Release(game_key(event.code)));
    }

    match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Quit)
        }
        KeyCode::Esc | KeyCode::Char('q') => Some(KeyAction::Quit),
        KeyCode::Enter | KeyCode::Char('r') if event.kind == KeyEventKind::Press => {
            Some(KeyAction::Restart)
        }
        code => match game_key(code) {
            Key::Other => None,
            key => Some(KeyAction::Press(key)),
        },
    }
}

/// Synthesizes key releases on terminals that only report presses: a held
/// key counts as released once no press or repeat arrives within the timeout.
#[derive(Debug)]
pub struct ReleaseFallback {
    timeout: Duration,
    enabled: bool,
    held: Option<(Key, Instant)>,
}

impl ReleaseFallback {
    pub fn new(timeout: Duration, enabled: bool) -> Self {
        Self {
            timeout,
            enabled,
            held: None,
        }
    }

    pub fn pressed(&mut self, key: Key, now: Instant) {
        if self.enabled {
            self.held = Some((key, now));
        }
    }

    pub fn released(&mut self) {
        self.held = None;
    }

    /// Key whose synthetic release is due, if any
    pub fn expired(&mut self, now: Instant) -> Option<Key> {
        match self.held {
            Some((key, last_seen)) if now.duration_since(last_seen) >= self.timeout => {
                self.held = None;
                Some(key)
            }
            _ => None,
        }
    }
}

/// Restores the terminal when dropped, including on early returns
struct TerminalGuard {
    enhanced: bool,
}

impl TerminalGuard {
    fn enter() -> io::Result<(Self, Term)> {
        terminal::enable_raw_mode()?;
        let mut guard = Self { enhanced: false };

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        if matches!(terminal::supports_keyboard_enhancement(), Ok(true)) {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            guard.enhanced = true;
        }

        let term = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok((guard, term))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        if self.enhanced {
            let _ = execute!(stdout, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

/// Run the render loop until the player quits, the session stops or
/// `shutdown` resolves. The session is always told to shut down on exit.
pub async fn run<S>(config: &Config, handle: SessionHandle, shutdown: S) -> anyhow::Result<()>
where
    S: Future<Output = ()>,
{
    let (guard, mut term) = TerminalGuard::enter()?;
    info!(release_events = guard.enhanced, "Terminal ready");

    let result = render_loop(config, &handle, &mut term, guard.enhanced, shutdown).await;

    drop(guard);
    handle.send(SessionCommand::Shutdown).await;
    result
}

async fn render_loop<S>(
    config: &Config,
    handle: &SessionHandle,
    term: &mut Term,
    release_events: bool,
    shutdown: S,
) -> anyhow::Result<()>
where
    S: Future<Output = ()>,
{
    let assets = Assets::load(&config.asset_dir);
    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut stars = Starfield::generate(config.star_count, config.bounds, &mut rng);
    let mut fallback = ReleaseFallback::new(config.key_release_timeout, !release_events);

    let mut frames = interval(config.frame);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut events = EventStream::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = frames.tick() => {
                if let Some(key) = fallback.expired(Instant::now()) {
                    if !handle.send(SessionCommand::KeyUp(key)).await {
                        break;
                    }
                }

                stars.drift();
                let snapshot = handle.latest();
                let commands = build_frame(&snapshot, &stars, &assets);
                term.draw(|frame| paint(frame, &commands, snapshot.bounds))?;
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => {
                    if !on_key(&key, handle, &mut fallback).await {
                        break;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}

/// Forward a key to the session; returns false when the frontend should stop
async fn on_key(
    event: &KeyEvent,
    handle: &SessionHandle,
    fallback: &mut ReleaseFallback,
) -> bool {
    match classify(event) {
        Some(KeyAction::Quit) => {
            debug!("Quit requested");
            false
        }
        Some(KeyAction::Restart) => {
            if handle.latest().game_over {
                handle.send(SessionCommand::Restart).await
            } else {
                true
            }
        }
        Some(KeyAction::Press(key)) => {
            fallback.pressed(key, Instant::now());
            handle.send(SessionCommand::KeyDown(key)).await
        }
        Some(KeyAction::Release(key)) => {
            fallback.released();
            handle.send(SessionCommand::KeyUp(key)).await
        }
        None => true,
    }
}

fn paint(frame: &mut Frame, commands: &[DrawCommand], bounds: Bounds) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    // canvas y grows upward
    let flip = |(x, y): (f64, f64)| (x, bounds.height - y);

    let mut stars: Vec<(f64, f64, f64)> = Vec::new();
    let mut ship: Vec<(f64, f64)> = Vec::new();
    let mut rocks: Vec<(f64, f64)> = Vec::new();
    let mut hud: Option<(&str, &str)> = None;
    let mut game_over: Option<(&str, &str)> = None;

    for command in commands {
        match command {
            DrawCommand::Clear => frame.render_widget(Clear, area),
            DrawCommand::Star { x, y, radius } => {
                let (x, y) = flip((*x, *y));
                stars.push((x, y, *radius));
            }
            DrawCommand::Sprite {
                kind,
                sprite,
                center,
                width,
                height,
                rotation,
            } => {
                let points = sprite
                    .points(*center, *width, *height, *rotation)
                    .into_iter()
                    .map(flip);
                match kind {
                    SpriteKind::Ship => ship.extend(points),
                    SpriteKind::Asteroid => rocks.extend(points),
                }
            }
            DrawCommand::Hud { time, best } => hud = Some((time.as_str(), best.as_str())),
            DrawCommand::GameOver { time, best } => {
                game_over = Some((time.as_str(), best.as_str()));
            }
        }
    }

    if let Some((time, best)) = hud {
        let status = Line::from(vec![
            Span::styled(
                format!(" Time: {} ", time),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("Best Time: {} ", best), Style::default().fg(Color::Cyan)),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);
    }

    let canvas = Canvas::default()
        .background_color(Color::Black)
        .marker(Marker::Braille)
        .x_bounds([0.0, bounds.width])
        .y_bounds([0.0, bounds.height])
        .paint(|ctx| {
            for &(x, y, radius) in &stars {
                ctx.draw(&Circle {
                    x,
                    y,
                    radius,
                    color: Color::White,
                });
            }
            ctx.layer();
            ctx.draw(&Points {
                coords: &rocks,
                color: Color::Rgb(190, 160, 120),
            });
            ctx.draw(&Points {
                coords: &ship,
                color: Color::Rgb(100, 200, 255),
            });
        });
    frame.render_widget(canvas, chunks[1]);

    let help = Line::from(Span::styled(
        " \u{2190}\u{2191}\u{2192}\u{2193} Move | Esc Quit ",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(help), chunks[2]);

    if let Some((time, best)) = game_over {
        let popup = centered(chunks[1], 32, 7);
        let text = vec![
            Line::from(Span::styled(
                "Game Over",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Your Time: {}", time)),
            Line::from(format!("Best Time: {}", best)),
            Line::from(Span::styled(
                "Enter to restart",
                Style::default().fg(Color::Gray),
            )),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(100, 200, 255)));
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(text).block(block).alignment(Alignment::Center),
            popup,
        );
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn arrows_press_and_release() {
        assert_eq!(
            classify(&key(KeyCode::Left, KeyEventKind::Press)),
            Some(KeyAction::Press(Key::Left))
        );
        assert_eq!(
            classify(&key(KeyCode::Down, KeyEventKind::Repeat)),
            Some(KeyAction::Press(Key::Down))
        );
        assert_eq!(
            classify(&key(KeyCode::Up, KeyEventKind::Release)),
            Some(KeyAction::Release(Key::Up))
        );
    }

    #[test]
    fn any_release_is_forwarded() {
        assert_eq!(
            classify(&key(KeyCode::Char('x'), KeyEventKind::Release)),
            Some(KeyAction::Release(Key::Other))
        );
    }

    #[test]
    fn control_keys() {
        assert_eq!(
            classify(&key(KeyCode::Esc, KeyEventKind::Press)),
            Some(KeyAction::Quit)
        );
        assert_eq!(
            classify(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyAction::Quit)
        );
        assert_eq!(
            classify(&key(KeyCode::Enter, KeyEventKind::Press)),
            Some(KeyAction::Restart)
        );
        assert_eq!(classify(&key(KeyCode::Enter, KeyEventKind::Repeat)), None);
        assert_eq!(classify(&key(KeyCode::Char('z'), KeyEventKind::Press)), None);
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_releases_after_timeout() {
        let mut fallback = ReleaseFallback::new(Duration::from_millis(600), true);
        let start = Instant::now();
        fallback.pressed(Key::Right, start);

        assert_eq!(fallback.expired(start + Duration::from_millis(599)), None);
        fallback.pressed(Key::Right, start + Duration::from_millis(500));
        assert_eq!(fallback.expired(start + Duration::from_millis(1_000)), None);
        assert_eq!(
            fallback.expired(start + Duration::from_millis(1_100)),
            Some(Key::Right)
        );
        assert_eq!(fallback.expired(start + Duration::from_millis(5_000)), None);
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_is_inert_when_the_terminal_reports_releases() {
        let mut fallback = ReleaseFallback::new(Duration::from_millis(600), false);
        let start = Instant::now();
        fallback.pressed(Key::Left, start);
        assert_eq!(fallback.expired(start + Duration::from_secs(10)), None);
    }

    #[test]
    fn popup_fits_small_areas() {
        let area = Rect::new(0, 1, 20, 5);
        let popup = centered(area, 32, 7);
        assert_eq!(popup, Rect::new(0, 1, 20, 5));

        let popup = centered(Rect::new(0, 0, 100, 40), 32, 7);
        assert_eq!(popup, Rect::new(34, 16, 32, 7));
    }
}
