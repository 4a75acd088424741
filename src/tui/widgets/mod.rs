//! Reusable TUI widgets.

pub mod banner;
pub mod field;

pub use banner::{SPINNER, draw_status_banner, draw_submit_button, spinner_frame};
pub use field::{FieldView, border_color, draw_field};

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use ratatui::Frame;

    pub(crate) fn buffer_to_string(buf: &Buffer) -> String {
        let mut s = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                s.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
            }
            s.push('\n');
        }
        s
    }

    /// Draws with `f` onto a blank `width`×`height` buffer and returns its text.
    pub(crate) fn render(width: u16, height: u16, f: impl FnOnce(&mut Frame, Rect)) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                f(frame, area);
            })
            .unwrap();
        buffer_to_string(terminal.backend().buffer())
    }
}
