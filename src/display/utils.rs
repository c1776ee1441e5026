use std::io::IsTerminal;

/// Terminal colors used by the result formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Reset,
    Gray,
    Blue,
    Yellow,
    Red,
}

/// カラーサポート検出
pub fn detect_color_support() -> bool {
    // NO_COLOR環境変数でカラー無効化
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    std::io::stdout().is_terminal() && std::env::var("TERM").is_ok_and(|term| term != "dumb")
}

pub fn color_to_ansi(color: Color) -> &'static str {
    match color {
        Color::Reset => "\x1b[0m",
        Color::Gray => "\x1b[90m",
        Color::Blue => "\x1b[34m",
        Color::Yellow => "\x1b[33m",
        Color::Red => "\x1b[31m",
    }
}

/// Wrap `text` in `color` when `enabled`
pub fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        format!("{}{}{}", color_to_ansi(color), text, color_to_ansi(Color::Reset))
    } else {
        text.to_string()
    }
}
