use gc_core::frame::GlyphGrid;
use gc_core::traits::StyleDescriptor;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::canvas;
use crate::sink::Hud;

/// Largeur fixe de la sidebar de contrôles.
pub const SIDEBAR_WIDTH: u16 = 22;

/// Draw the full UI: canvas + sidebar + overlays.
pub fn draw(frame: &mut Frame, grid: &GlyphGrid, style: &StyleDescriptor, hud: &Hud) {
    let area = frame.area();

    let canvas_area = if hud.config.show_sidebar {
        let h_chunks =
            Layout::horizontal([Constraint::Min(20), Constraint::Length(SIDEBAR_WIDTH)])
                .split(area);
        draw_sidebar(frame, h_chunks[1], style, hud);
        h_chunks[0]
    } else {
        area
    };

    canvas::render_grid(frame.buffer_mut(), canvas_area, grid, style.fg, style.bg);

    if let Some(notice) = &hud.notice {
        draw_notice(frame, canvas_area, notice);
    }

    if let Some((buf, cursor)) = &hud.ramp_edit {
        draw_ramp_editor(frame, area, buf, *cursor);
    }

    if hud.show_help {
        draw_help_overlay(frame, area);
    }
}

/// Bandeau persistant pour la capture indisponible — reste affiché tant
/// que la notice n'est pas levée, le pipeline restant au repos.
fn draw_notice(frame: &mut Frame, area: Rect, notice: &str) {
    let height = 3u16;
    let rect = Rect::new(
        area.x,
        area.y + area.height.saturating_sub(height),
        area.width,
        height.min(area.height),
    );
    let banner = Paragraph::new(Line::from(Span::styled(
        format!(" {notice} "),
        Style::default().fg(Color::White).bg(Color::Red),
    )))
    .block(Block::default().borders(Borders::ALL).title(" Capture "));
    frame.render_widget(banner, rect);
}

/// Marque de verrou pour une dimension géométrique.
fn lock_mark(locked: bool) -> &'static str {
    if locked { "*" } else { " " }
}

/// Draw the parameter sidebar with all live values.
fn draw_sidebar(frame: &mut Frame, area: Rect, style: &StyleDescriptor, hud: &Hud) {
    let config = &hud.config;

    let state_str = if hud.paused { "⏸ PAUSE" } else { "▶ RUN" };
    let ramp_names = ["Compact", "Standard", "Blocks", "Minimal", "Binary"];
    // Une rampe éditée à la main ne correspond plus au preset affiché.
    let ramp_name = match gc_core::ramp::RAMP_PRESETS.get(config.ramp_index) {
        Some(&preset) if preset == config.glyph_ramp => {
            ramp_names.get(config.ramp_index).copied().unwrap_or("Custom")
        }
        _ => "Custom",
    };

    let mut lines = vec![
        Line::from(Span::styled(state_str, Style::default().fg(Color::Green))),
        Line::from(""),
        Line::from(Span::styled(
            "─ Mosaic ────",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(format!(" Ramp: {ramp_name}")),
        Line::from(format!(" Step: {}", config.sample_step)),
        Line::from(format!(
            " Mirror: {}",
            if config.mirror { "ON" } else { "OFF" }
        )),
        Line::from(format!(
            " Invert: {}",
            if config.invert { "ON" } else { "OFF" }
        )),
        Line::from(format!(
            " Gray: {}",
            if config.grayscale { "ON" } else { "OFF" }
        )),
        Line::from(format!(" Contr: {:.0}%", config.contrast)),
        Line::from(format!(" Bright: {:.0}%", config.brightness)),
        Line::from(format!(" Satur: {:.0}%", config.saturation)),
        Line::from(""),
        Line::from(Span::styled(
            "─ Glyphs ────",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(format!(
            "{}Size: {:.1}px",
            lock_mark(config.locks.font_size),
            style.font_size
        )),
        Line::from(format!(
            "{}Spac: {:.2}em",
            lock_mark(config.locks.letter_spacing),
            style.letter_spacing
        )),
        Line::from(format!(
            "{}Line: {:.2}",
            lock_mark(config.locks.line_height),
            style.line_height
        )),
        Line::from(format!(" Font: {}", style.font_family)),
        Line::from(format!(" View: {}×{}", config.viewport_w, config.viewport_h)),
        Line::from(""),
        Line::from(Span::styled(
            "─ Info ──────",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(format!(" {:.0} FPS", hud.fps)),
        Line::from(format!(" {:.1}ms", hud.frame_time_ms)),
    ];

    if hud.auto_randomize {
        lines.push(Line::from(Span::styled(
            " ⚅ AUTO-RAND",
            Style::default().fg(Color::Magenta),
        )));
    }
    if let Some(flash) = &hud.flash {
        lines.push(Line::from(Span::styled(
            format!(" {flash}"),
            Style::default().fg(Color::Cyan),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " ? = help",
        Style::default().fg(Color::DarkGray),
    )));

    let sidebar =
        Paragraph::new(lines).block(Block::default().borders(Borders::LEFT).title(" Params "));
    frame.render_widget(sidebar, area);
}

/// Éditeur de rampe inline : buffer + curseur.
fn draw_ramp_editor(frame: &mut Frame, area: Rect, buf: &str, cursor: usize) {
    let width = area.width.saturating_sub(4).clamp(20, 60);
    let height = 5u16;
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let rect = Rect::new(x, y, width, height);

    let mut shown = String::with_capacity(buf.len() + 1);
    for (i, ch) in buf.chars().enumerate() {
        if i == cursor {
            shown.push('▏');
        }
        shown.push(ch);
    }
    if cursor >= buf.chars().count() {
        shown.push('▏');
    }

    let editor = Paragraph::new(vec![
        Line::from(" Rampe (sombre → dense), Entrée pour appliquer :"),
        Line::from(Span::styled(
            format!(" {shown}"),
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            " Esc pour annuler — 2 caractères minimum",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Ramp Edit ")
            .style(Style::default().bg(Color::Black).fg(Color::White)),
    );
    frame.render_widget(editor, rect);
}

/// Draw a centered help overlay with all keybindings.
fn draw_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            " glyphcam — Controls ",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(" q/Esc    Quit"),
        Line::from(" Space    Play/Pause"),
        Line::from(" Tab      Toggle sidebar"),
        Line::from(" 1-5      Ramp preset"),
        Line::from(" e        Edit ramp"),
        Line::from(" d/D      Sample step ±"),
        Line::from(" i        Toggle invert"),
        Line::from(" m        Toggle mirror"),
        Line::from(" g        Toggle grayscale"),
        Line::from(" [/]      Contrast ±"),
        Line::from(" {/}      Brightness ±"),
        Line::from(" -/+      Saturation ±"),
        Line::from(" f/F      Font size ± (lock)"),
        Line::from(" l/L      Letter spacing ± (lock)"),
        Line::from(" h/H      Line height ± (lock)"),
        Line::from(" v        Cycle viewport"),
        Line::from(" r        Randomize"),
        Line::from(" R        Auto-randomize on/off"),
        Line::from(" x        Export snapshot"),
        Line::from(" 0        Full reset (clear locks)"),
        Line::from(" ?        Toggle help"),
        Line::from(""),
        Line::from(Span::styled(
            " Press ? or Esc to close ",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help_width = 40u16;
    let help_height = help_text.len() as u16 + 2;
    let x = area.x + area.width.saturating_sub(help_width) / 2;
    let y = area.y + area.height.saturating_sub(help_height) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(Style::default().bg(Color::Black).fg(Color::White)),
    );
    frame.render_widget(help, help_area);
}
