use std::io::{self, Write};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use knnsweep::core::attributes::Attribute;
use knnsweep::evaluation::{CurveFormat, SweepPoint};
use knnsweep::tasks::{SweepReport, SweepTask};
use knnsweep::ui::cli::{Cli, Command, InquireDriver, prompt_config};
use knnsweep::ui::types::SweepConfig;
use knnsweep::ui::types::schema::schema_for;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const FG_CYAN: &str = "\x1b[36m";
const FG_GREEN: &str = "\x1b[32m";
const FG_MAGENTA: &str = "\x1b[35m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_GREY: &str = "\x1b[90m";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config: SweepConfig = match cli.command {
        Some(Command::Schema) => {
            let schema = schema_for::<SweepConfig>();
            println!("{}", serde_json::to_string_pretty(&schema)?);
            return Ok(());
        }
        Some(Command::Run(args)) => args.into_config()?,
        None => {
            let driver = InquireDriver;
            prompt_config(&driver).context("failed while prompting for the sweep")?
        }
    };

    let header: Vec<String> = vec![
        format!("{BOLD}{FG_CYAN}▶ K-Nearest-Neighbors Sweep{RESET}"),
        format!(
            "{DIM}data={}{RESET}  {DIM}k={}{RESET}  {DIM}test_fraction={}{RESET}  {DIM}seed={}{RESET}  {DIM}scaling={}{RESET}  {}",
            config.data.display(),
            config.k_values,
            config.test_fraction,
            config.seed,
            config.scaling,
            timestamp_now()
        ),
        format!(
            "{FG_GREY}────────────────────────────────────────────────────────────────────────{RESET}"
        ),
    ];

    let dump_path = config.dump_file.clone();
    let dump_format = config.dump_format;

    let (tx, rx) = std::sync::mpsc::channel();
    let task = SweepTask::new(config)?.with_progress(tx);
    let total = task.k_values().len();
    let render = std::thread::spawn(move || render_status_with_header(rx, header, 150, total));

    let outcome = task.run();
    drop(task);
    if render.join().is_err() {
        eprintln!("{FG_YELLOW}progress display thread panicked; continuing with the report{RESET}");
    }
    let report = outcome.context("sweep failed")?;

    print_report(&report);

    if let Some(path) = dump_path
        && !path.as_os_str().is_empty()
    {
        report
            .curve
            .export(&path, CurveFormat::from(dump_format))
            .with_context(|| format!("failed to export the sweep curve to {}", path.display()))?;
        println!("{DIM}curve written to {}{RESET}", path.display());
    }

    Ok(())
}

/// Print header once, then refresh a single line with the latest k.
pub fn render_status_with_header(
    rx: Receiver<SweepPoint>,
    header_lines: Vec<String>,
    repaint_every_ms: u64,
    total: usize,
) {
    for line in &header_lines {
        println!("{line}");
    }

    println!();
    let _ = io::stdout().flush();

    let tick = Duration::from_millis(repaint_every_ms);
    let mut last_draw = Instant::now();
    let mut last_point: Option<SweepPoint> = None;
    let mut done = 0usize;

    loop {
        match rx.recv_timeout(tick) {
            Ok(p) => {
                done += 1;
                last_point = Some(p);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                if let Some(p) = last_point.take() {
                    print!("\r{}\x1B[K\n", format_status(&p, done, total));
                    let _ = io::stdout().flush();
                }
                break;
            }
        }

        if last_draw.elapsed() >= tick {
            if let Some(p) = last_point.as_ref() {
                print!("\r{}\x1B[K", format_status(p, done, total));
                let _ = io::stdout().flush();
            }
            last_draw = Instant::now();
        }
    }
}

fn format_status(p: &SweepPoint, done: usize, total: usize) -> String {
    format!(
        "{FG_GREEN}{BOLD}k{RESET} {:>4}  \
         {FG_CYAN}{BOLD}train{RESET} {:>7}%  \
         {FG_MAGENTA}{BOLD}test{RESET} {:>7}%  \
         {DIM}t{RESET} {:>9.6}s  \
         {DIM}[k]{RESET} {}",
        p.k,
        fmtf(p.training_accuracy * 100.0, 3),
        fmtf(p.testing_accuracy * 100.0, 3),
        p.seconds,
        progress_bar(done as f64, total as f64, 15)
    )
}

fn print_report(report: &SweepReport) {
    let header = &report.header;
    println!(
        "{BOLD}{}{RESET}  {DIM}{} features, {} classes, train={} test={}{RESET}",
        header.relation_name(),
        header.number_of_features(),
        header.number_of_classes(),
        report.train_size,
        report.test_size
    );
    if let Some(scaler) = &report.scaler {
        let flat = scaler.degenerate_columns();
        if !flat.is_empty() {
            let names: Vec<&str> = flat
                .iter()
                .filter_map(|&i| header.feature_at_index(i).map(|a| a.name()))
                .collect();
            println!("{FG_YELLOW}constant columns centered only: {}{RESET}", names.join(", "));
        }
    }
    println!(
        "{DIM}null accuracy{RESET} {}%   {DIM}majority baseline{RESET} {}%",
        fmtf(report.null_accuracy * 100.0, 3),
        fmtf(report.baseline_accuracy * 100.0, 3)
    );
    println!();

    println!(
        "{BOLD}{:>5}  {:>10}  {:>10}  {:>10}{RESET}",
        "k", "train %", "test %", "gap"
    );
    for p in report.curve.iter() {
        let marker = if p.k == report.best_k {
            format!("{FG_GREEN}◀ best{RESET}")
        } else {
            String::new()
        };
        println!(
            "{:>5}  {:>10}  {:>10}  {:>10}  {marker}",
            p.k,
            fmtf(p.training_accuracy * 100.0, 3),
            fmtf(p.testing_accuracy * 100.0, 3),
            fmtf(p.generalization_gap() * 100.0, 3)
        );
    }

    if let Some(best) = report.best_point() {
        println!();
        println!(
            "{BOLD}best k = {}{RESET} with test accuracy {}%",
            best.k,
            fmtf(best.testing_accuracy * 100.0, 3)
        );
    }
}

fn progress_bar(current: f64, total: f64, width: usize) -> String {
    if total.is_finite() && total > 0.0 {
        let ratio = (current / total).clamp(0.0, 1.0);
        let filled = (ratio * width as f64).round() as usize;
        let empty = width.saturating_sub(filled);
        return format!(
            "[{}{}] {:>3.0}%",
            "█".repeat(filled),
            "░".repeat(empty),
            ratio * 100.0
        );
    }

    String::new()
}

fn fmtf(x: f64, prec: usize) -> String {
    if x.is_nan() {
        format!("{DIM}NaN{RESET}")
    } else {
        format!("{:>1$.prec$}", x, 6, prec = prec)
    }
}

fn timestamp_now() -> String {
    use chrono::{Local, SecondsFormat};
    let now = Local::now();
    format!(
        "{DIM}{}{}",
        now.to_rfc3339_opts(SecondsFormat::Secs, true),
        RESET
    )
}
