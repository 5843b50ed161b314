use anstyle::{AnsiColor, Color, Effects, Style};

pub const NORMAL: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightWhite)));

pub const INFO: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlue)));

pub const SECONDARY: Style = Style::new()
    .fg_color(Some(Color::Ansi(AnsiColor::BrightBlue)))
    .effects(Effects::DIMMED);

pub const SUCCESS: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightGreen)));

pub const WARNING: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightYellow)));

pub const DANGER: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightRed)));

pub fn paint(style: Style, text: impl std::fmt::Display) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

pub fn get_clap_styles() -> clap::builder::Styles {
    let header = Style::new()
        .fg_color(Some(Color::Ansi(AnsiColor::Green)))
        .bold();
    let literal = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));

    clap::builder::Styles::styled()
        .header(header)
        .usage(header)
        .literal(literal)
        .placeholder(literal)
}
