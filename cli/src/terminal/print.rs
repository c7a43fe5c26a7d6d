use crate::terminal::colors;
use colored::*;
use tracing::info;

pub const TOTAL_WIDTH: usize = 64;
pub const TARGET: &str = "lanprobe::print";

pub fn print(msg: &str) {
    info!(target: TARGET, "{msg}");
}

pub fn header(msg: &str, quiet: bool) {
    if quiet {
        return;
    }

    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&format!("{}", line));
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).bright_black();
    print(&format!("{}", sep));
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    let prefix: ColoredString = ">".color(colors::SEPARATOR);
    let message: String = format!("{} {}", prefix, msg.as_ref().color(colors::TEXT_DEFAULT));
    print(&message);
}

/// Left-aligned columns padded to their widest cell, headers underlined.
pub fn table<const N: usize>(headers: [&str; N], rows: &[[ColoredString; N]]) {
    let mut widths: [usize; N] = headers.map(console::measure_text_width);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(console::measure_text_width(cell));
        }
    }

    let sep: String = format!(" {} ", "│".color(colors::SEPARATOR));
    let header_line: Vec<String> = headers
        .iter()
        .zip(widths)
        .map(|(h, w)| pad(&h.color(colors::PRIMARY).bold().to_string(), w))
        .collect();
    print(&header_line.join(&sep));

    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    print(&format!("{}", rule.join("─┼─").color(colors::SEPARATOR)));

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, w)| pad(&cell.to_string(), w))
            .collect();
        print(&cells.join(&sep));
    }
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(console::measure_text_width(text));
    format!("{}{}", text, " ".repeat(fill))
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{}{}{}", space, msg, space));
}

const NO_RESULTS: &str = r#"
                       _  _    ___  _  _
                      | || |  / _ \| || |
                      | || |_| | | | || |_
                      |__   _| |_| |__   _|
         _   _  ___ _____|_|__\___/__ |_|  _ _   _ ____
        | \ | |/ _ \_   _| |  ___/ _ \| | | | \ | |  _ \
        |  \| | | | || |   | |_ | | | | | | |  \| | | | |
        | |\  | |_| || |   |  _|| |_| | |_| | |\  | |_| |
        |_| \_|\___/ |_|   |_|   \___/ \___/|_| \_|____/
"#;

pub fn no_results() {
    print(&format!("{}", NO_RESULTS.red().bold()));
}
