use crate::core::symbol::Symbol;
use crate::domain::model::RenderConfig;
use crate::domain::ports::Renderer;

/// Text rendering, one character per module.
///
/// Bar rows come first. With `show_text`, a row carrying only the guard bars
/// follows, then the digits under their groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiRenderer;

impl Renderer for AsciiRenderer {
    fn render(&self, symbol: &Symbol, config: &RenderConfig) -> Vec<u8> {
        let layout = symbol.layout();
        let (left_quiet, right_quiet) = if config.quiet_zone {
            (layout.left_quiet_zone, layout.right_quiet_zone)
        } else {
            (0, 0)
        };

        let draw = |keep: &dyn Fn(usize) -> bool| -> String {
            let mut row = String::new();
            row.extend(std::iter::repeat(config.space_glyph).take(left_quiet));
            for (index, module) in symbol.pattern().modules().iter().enumerate() {
                let glyph = if module.is_bar() && keep(index) {
                    config.bar_glyph
                } else {
                    config.space_glyph
                };
                row.push(glyph);
            }
            row.extend(std::iter::repeat(config.space_glyph).take(right_quiet));
            row
        };

        let bars = draw(&|_| true);
        let mut out = String::new();
        for _ in 0..config.ascii_rows.max(1) {
            out.push_str(&bars);
            out.push('\n');
        }

        if config.show_text {
            out.push_str(draw(&|index| layout.is_guard(index)).trim_end());
            out.push('\n');

            let mut text = vec![' '; symbol.width(config.quiet_zone)];
            let lead_column = left_quiet.saturating_sub(4);
            text[lead_column] = symbol.code().first_digit().to_char();
            for (position, digit) in symbol.code().digits()[1..].iter().enumerate() {
                text[left_quiet + layout.digit_center(position)] = digit.to_char();
            }
            out.push_str(text.into_iter().collect::<String>().trim_end());
            out.push('\n');
        }

        out.into_bytes()
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}
