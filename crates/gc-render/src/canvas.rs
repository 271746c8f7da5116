use gc_core::frame::GlyphGrid;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

/// Écrit directement une `GlyphGrid` dans un `ratatui::Buffer`.
///
/// Pas de widget intermédiaire — écriture directe pour zéro overhead.
/// La grille est clipée à la zone; encre et fond sont uniformes (le
/// descripteur de style porte les couleurs, pas les cellules).
pub fn render_grid(
    buf: &mut Buffer,
    area: Rect,
    grid: &GlyphGrid,
    fg: (u8, u8, u8),
    bg: (u8, u8, u8),
) {
    let fg = Color::Rgb(fg.0, fg.1, fg.2);
    let bg = Color::Rgb(bg.0, bg.1, bg.2);

    let rows = grid.rows.min(area.height as usize);
    let cols = grid.cols.min(area.width as usize);

    for cy in 0..area.height {
        for cx in 0..area.width {
            let buf_x = area.x + cx;
            let buf_y = area.y + cy;
            if let Some(buf_cell) = buf.cell_mut((buf_x, buf_y)) {
                let inside = (cy as usize) < rows && (cx as usize) < cols;
                let ch = if inside {
                    grid.get(cx as usize, cy as usize)
                } else {
                    ' '
                };
                buf_cell.set_char(ch).set_fg(fg).set_bg(bg);
            }
        }
    }
}
