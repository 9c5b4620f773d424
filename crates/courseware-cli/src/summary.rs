use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use courseware_cli::runner::format_clock;
use courseware_document::{BlockKind, Document};
use courseware_model::rating::{MAX_STARS, MIN_STARS};
use courseware_model::{Availability, QuestionSet, RatingSummary};

pub fn print_blocks(document: &Document) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Pos"),
        header_cell("Kind"),
        header_cell("Text"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for block in document.blocks() {
        let text = if block.text.is_empty() {
            dim_cell("(empty)")
        } else {
            Cell::new(&block.text)
        };
        table.add_row(vec![Cell::new(block.position), kind_cell(block.kind), text]);
    }
    println!("{table}");
}

pub fn print_quiz(set: &QuestionSet, availability: Availability) {
    let quiz = &set.quiz;
    println!("Quiz: {} ({})", quiz.title, quiz.id);
    if quiz.duration_minutes == 0 {
        println!("Time limit: none");
    } else {
        println!("Time limit: {}", format_clock(quiz.duration_seconds()));
    }
    println!("Points: {}", set.points_available());
    println!("Status: {}", availability_label(availability));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Question"),
        header_cell("Options"),
        header_cell("Points"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for (number, question) in set.ordered_questions().iter().enumerate() {
        let options = if question.options.is_empty() {
            count_cell(0, Color::Red)
        } else {
            Cell::new(question.options.len())
        };
        table.add_row(vec![
            Cell::new(number + 1),
            Cell::new(&question.text),
            options,
            Cell::new(question.points),
        ]);
    }
    println!("{table}");
}

pub fn print_ratings(summary: &RatingSummary) {
    println!(
        "Ratings: {}  Average: {:.1}",
        summary.count,
        summary.display_average()
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stars"),
        header_cell("Count"),
        header_cell("Share"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for stars in (MIN_STARS..=MAX_STARS).rev() {
        let count = summary.distribution[usize::from(stars - MIN_STARS)];
        table.add_row(vec![
            Cell::new("*".repeat(usize::from(stars))).fg(Color::Yellow),
            count_cell(count, Color::Reset),
            Cell::new(format!("{}%", summary.share_percent(stars))),
        ]);
    }
    println!("{table}");
    if summary.rejected > 0 {
        eprintln!("Ignored {} ratings outside 1-5 stars.", summary.rejected);
    }
}

fn availability_label(availability: Availability) -> String {
    match availability {
        Availability::Open => "open".to_string(),
        Availability::Unpublished => "not published".to_string(),
        Availability::NotYetOpen { opens_at } => format!("opens {}", opens_at.to_rfc3339()),
        Availability::Closed { closed_at } => format!("closed {}", closed_at.to_rfc3339()),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn kind_cell(kind: BlockKind) -> Cell {
    let cell = Cell::new(kind);
    if kind.is_heading() {
        cell.add_attribute(Attribute::Bold)
    } else if kind == BlockKind::Image {
        cell.fg(Color::Magenta)
    } else {
        cell
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
