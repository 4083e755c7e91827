// src/ui.rs

use crate::{
    constants,
    models::{Course, CourseSelection, Section},
    symbols, utils,
};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::{
    io::{self, Write},
    time::Duration,
};

const PROGRESS_TEMPLATE: &str = "{prefix:7.bold.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}/{len:3} ({percent:>3}%) [ETA: {eta}]";

pub fn print_header(title: &str) {
    println!("\n{}", "═".repeat(constants::UI_WIDTH));
    println!(" {}", title.cyan().bold());
    println!("{}", "═".repeat(constants::UI_WIDTH));
}

pub fn print_sub_header(title: &str) {
    println!("\n--- {} ---", title.bold());
}

pub fn info(message: &str) {
    println!("{} {}", *symbols::INFO, message);
}

pub fn warn(message: &str) {
    println!("{} {}", *symbols::WARN, message.yellow());
}

pub fn prompt_hidden(message: &str) -> io::Result<String> {
    print!("\n>>> {}: ", message);
    io::stdout().flush()?;
    rpassword::read_password()
}

pub fn new_tasks_progress_bar(len: u64, prefix: &str) -> ProgressBar {
    let pbar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template(PROGRESS_TEMPLATE) {
        pbar.set_style(style.progress_chars("#>-"));
    }
    pbar.set_prefix(prefix.to_string());
    pbar.enable_steady_tick(Duration::from_millis(100));
    pbar
}

/// `--course-list` 的输出
pub fn display_courses(courses: &[Course]) {
    print_sub_header(&format!("共有 {} 门已开课的课程", courses.len()));
    for (i, course) in courses.iter().enumerate() {
        println!(
            "{} - {} [{}]",
            format!("{:2}", i + 1).yellow(),
            course.name.bold(),
            course.id.as_deref().unwrap_or("-")
        );
        println!("     {}", course.url.as_deref().unwrap_or("-").dimmed());
    }
}

/// `--section-list` 的输出
pub fn display_sections_menu(course: &Course, sections: &[Section]) {
    print_sub_header(&format!(
        "{} [{}] 目前共有 {} 个章节",
        course.name,
        course.id.as_deref().unwrap_or("-"),
        sections.len()
    ));
    for (i, section) in sections.iter().enumerate() {
        println!("{} - {}", format!("{:2}", i + 1).yellow(), section.name);
    }
}

pub fn display_selections(selections: &[CourseSelection]) {
    for selection in selections {
        print_header(&format!(
            "准备下载 {} [{}]",
            selection.course.name,
            selection.course.id.as_deref().unwrap_or("-")
        ));
        info(&format!("共 {} 个章节", selection.sections.len()));
        for section in &selection.sections {
            println!("Section {:2}: {}", section.position, section.name.bold());
            for subsection in &section.subsections {
                println!(
                    "  {}",
                    utils::truncate_text(&subsection.name, constants::UI_WIDTH - 4)
                );
            }
        }
    }
}
