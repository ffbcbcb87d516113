use std::io::{self, Write};

use smartjob_core::{
    AppViewModel, BarSeries, FeedbackView, JobRowView, LoginView, Notice, RecommendationSection,
    SkillChart, SkillsSection,
};

use super::constants::*;

/// Print every section whose view changed between two renders.
pub fn render_changes<W: Write>(
    prev: &AppViewModel,
    next: &AppViewModel,
    out: &mut W,
) -> io::Result<()> {
    if prev.authenticated != next.authenticated {
        write_session(next.authenticated, out)?;
    }
    if prev.login != next.login {
        write_login(&next.login, out)?;
    }
    if prev.upload_notice != next.upload_notice
        || prev.upload_notice_revision != next.upload_notice_revision
    {
        if let Some(notice) = &next.upload_notice {
            writeln!(out, "{TAG_UPLOAD} {}", notice_text(notice))?;
        }
    }
    if prev.attempt != next.attempt {
        write_attempt(next, out)?;
    }
    if prev.recommendations != next.recommendations {
        write_recommendations(&next.recommendations, out)?;
    }
    if prev.skills != next.skills {
        write_skills(&next.skills, out)?;
    }
    if prev.feedback != next.feedback {
        write_feedback(&next.feedback, out)?;
    }
    out.flush()
}

/// Print the whole view, for `status`.
pub fn render_full<W: Write>(view: &AppViewModel, out: &mut W) -> io::Result<()> {
    write_session(view.authenticated, out)?;
    write_login(&view.login, out)?;
    if let Some(notice) = &view.upload_notice {
        writeln!(out, "{TAG_UPLOAD} {}", notice_text(notice))?;
    }
    write_attempt(view, out)?;
    write_recommendations(&view.recommendations, out)?;
    write_skills(&view.skills, out)?;
    write_feedback(&view.feedback, out)?;
    out.flush()
}

fn write_session<W: Write>(authenticated: bool, out: &mut W) -> io::Result<()> {
    if authenticated {
        writeln!(out, "{TAG_SESSION} Logged in.")
    } else {
        writeln!(out, "{TAG_SESSION} Not logged in.")
    }
}

fn write_login<W: Write>(login: &LoginView, out: &mut W) -> io::Result<()> {
    if login.in_progress {
        writeln!(out, "{TAG_LOGIN} Logging in...")?;
    } else if let Some(error) = &login.error {
        writeln!(out, "{TAG_LOGIN} {error}")?;
    }
    Ok(())
}

fn write_attempt<W: Write>(view: &AppViewModel, out: &mut W) -> io::Result<()> {
    if let (Some(attempt), Some(file_name)) = (view.attempt, &view.file_name) {
        writeln!(
            out,
            "{TAG_UPLOAD} Uploading {file_name} (attempt {attempt})..."
        )?;
    }
    Ok(())
}

fn write_recommendations<W: Write>(
    section: &RecommendationSection,
    out: &mut W,
) -> io::Result<()> {
    if section.loading {
        return Ok(());
    }
    if let Some(error) = &section.error {
        return writeln!(out, "{TAG_RECOMMENDATIONS} {error}");
    }
    if let Some(narrative) = &section.narrative {
        writeln!(out, "{TAG_RECOMMENDATIONS}")?;
        writeln!(out, "{}", narrative.heading)?;
        writeln!(out, "{}", narrative.text)?;
        writeln!(out)?;
    }
    if !section.rows.is_empty() {
        write_job_table(&section.rows, out)?;
    }
    Ok(())
}

fn write_job_table<W: Write>(rows: &[JobRowView], out: &mut W) -> io::Result<()> {
    let cells: Vec<[String; 4]> = rows
        .iter()
        .filter_map(|row| match row {
            JobRowView::Job {
                title,
                company,
                location,
                description,
            } => Some([
                fit(title),
                fit(company),
                fit(location),
                fit(description),
            ]),
            JobRowView::NoResults { .. } => None,
        })
        .collect();

    if cells.is_empty() {
        for row in rows {
            if let JobRowView::NoResults { message } = row {
                writeln!(out, "{message}")?;
            }
        }
        return Ok(());
    }

    let mut widths = JOB_COLUMNS.map(|header| header.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = JOB_COLUMNS.map(str::to_string);
    write_row(&header, &widths, out)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(out, "{}", rule.join("-+-"))?;
    for row in &cells {
        write_row(row, &widths, out)?;
    }
    Ok(())
}

fn write_row<W: Write>(cells: &[String; 4], widths: &[usize; 4], out: &mut W) -> io::Result<()> {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    writeln!(out, "{}", padded.join(" | ").trim_end())
}

/// One-line cell text, cut to the column limit.
fn fit(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= MAX_CELL_WIDTH {
        return flat;
    }
    let mut cut: String = flat.chars().take(MAX_CELL_WIDTH - 3).collect();
    cut.push_str("...");
    cut
}

fn write_skills<W: Write>(section: &SkillsSection, out: &mut W) -> io::Result<()> {
    if section.loading {
        return Ok(());
    }
    if let Some(error) = &section.error {
        return writeln!(out, "{TAG_SKILLS} {error}");
    }
    match &section.chart {
        Some(SkillChart::Bars(series)) => {
            writeln!(out, "{TAG_SKILLS}")?;
            write_bar_chart(series, out)
        }
        Some(SkillChart::NoSkills { message }) => writeln!(out, "{TAG_SKILLS} {message}"),
        None => Ok(()),
    }
}

fn write_bar_chart<W: Write>(series: &BarSeries, out: &mut W) -> io::Result<()> {
    let label_width = series
        .labels
        .iter()
        .map(|label| label.chars().count())
        .chain(std::iter::once(series.x_title.chars().count()))
        .max()
        .unwrap_or(0);

    writeln!(out, "{}", series.title)?;
    writeln!(out, "{:<label_width$} | {}", series.x_title, series.y_title)?;
    for (label, value) in series.labels.iter().zip(&series.values) {
        let filled = bar_cells(*value, series.y_range);
        writeln!(
            out,
            "{label:<label_width$} | {}{} {value}",
            "#".repeat(filled),
            " ".repeat(BAR_WIDTH - filled)
        )?;
    }
    Ok(())
}

/// Bar length for `value` on the axis. Only the drawing is clamped; the
/// printed value stays as received.
fn bar_cells(value: f64, (low, high): (f64, f64)) -> usize {
    if high <= low || value.is_nan() {
        return 0;
    }
    let ratio = ((value - low) / (high - low)).clamp(0.0, 1.0);
    (ratio * BAR_WIDTH as f64).round() as usize
}

fn write_feedback<W: Write>(feedback: &FeedbackView, out: &mut W) -> io::Result<()> {
    if feedback.sending {
        writeln!(out, "{TAG_FEEDBACK} Sending...")?;
    } else if let Some(notice) = &feedback.notice {
        writeln!(out, "{TAG_FEEDBACK} {}", notice_text(notice))?;
    }
    Ok(())
}

fn notice_text(notice: &Notice) -> String {
    match notice {
        Notice::Success(text) | Notice::Error(text) => text.clone(),
        Notice::Warning(text) => format!("Warning: {text}"),
    }
}
