mod analyze;
mod ingest;
mod model;
mod report;
mod simulate;
mod utils;

use crate::analyze::{
    buffered_ticket_count, remaining_tickets, tickets_per_week_for_deadline, CycleTimeAnalysis,
    RecordsFilter, ThroughputAnalysis,
};
use crate::model::{ForecastConfig, Records, Result};
use crate::report::{ForecastReport, MarkdownReport, MIN_COMPLETED_FOR_FORECAST};
use crate::simulate::MonteCarloSimulator;
use crate::utils::StageProgress;
use chrono::Local;
use clap::Parser;
use indicatif::MultiProgress;
use std::fs;

#[derive(Parser, Debug, Clone)]
struct Args {
    #[arg(long = "config", default_value = "forecast.json")]
    config_path: String,
    #[arg(long = "tickets", default_value = "tickets.json")]
    tickets_path: String,
    #[arg(long = "output", default_value = "output")]
    output_path: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(error) = run(&args).await {
        eprintln!("forecast failed: {error}");
        std::process::exit(1);
    }
}

async fn run(args: &Args) -> Result<()> {
    let (config, records) = load_inputs(args).await?;

    let cycle_times = CycleTimeAnalysis::from_records(&records.for_cycle_time(&config));
    let throughput = ThroughputAnalysis::from_records(&records.for_throughput(&config));

    fs::create_dir_all(&args.output_path)
        .map_err(|error| format!("the output directory `{}` can't be created: {error}", args.output_path))?;
    export_json(
        &args.output_path,
        "cycle_times.json",
        serde_json::to_string_pretty(&cycle_times.tickets)?,
    )?;
    export_json(
        &args.output_path,
        "weekly_throughput.json",
        serde_json::to_string_pretty(&throughput.weeks)?,
    )?;

    let remaining = match config.remaining_ticket_count {
        Some(count) => count,
        None => {
            let backlog = remaining_tickets(&records.for_backlog(&config));
            let buffered = buffered_ticket_count(backlog, config.buffer_percent);
            println!(
                "Remaining tickets: {backlog} ({buffered} with a {:.0}% buffer)",
                config.buffer_percent
            );
            buffered
        }
    };

    if let Some(takt_time) = throughput.takt_time(config.available_hours_per_week) {
        println!("Average takt time: {takt_time:.2} hours per ticket");
    }

    let mut report = ForecastReport {
        release: config.release.clone(),
        included_wip_categories: config.included_wip_categories.clone(),
        excluded_from_statuses: config.excluded_from_statuses.clone(),
        excluded_issue_types: config.excluded_issue_types.clone(),
        completed_tickets: throughput.completed_tickets,
        median_cycle_time: cycle_times.median().unwrap_or(0.0),
        cycle_time_std_dev: cycle_times.std_dev().unwrap_or(0.0),
        rolling_avg_weeks: config.rolling_avg_weeks,
        rolling_capacity: throughput
            .rolling_capacity(config.rolling_avg_weeks, config.rolling_stat)
            .unwrap_or(0.0),
        confidence_level: config.confidence_level,
        remaining_tickets: remaining,
        buffer_percent: config.buffer_percent,
        weeks_to_complete: Vec::new(),
        today: Local::now().date_naive(),
    };

    if remaining == 0 {
        println!("All remaining tickets are done; nothing left to forecast.");
        return Ok(());
    }
    if throughput.completed_tickets < MIN_COMPLETED_FOR_FORECAST {
        println!("{}", report.insufficient_data_notice());
        return Ok(());
    }

    report.weeks_to_complete = MonteCarloSimulator::run(
        &throughput.counts(),
        config.rolling_avg_weeks,
        remaining,
        config.n_simulations,
        &mut rand::rng(),
    )?;
    export_json(
        &args.output_path,
        "weeks_to_complete.json",
        serde_json::to_string_pretty(&report.weeks_to_complete)?,
    )?;

    println!("{}", report.generate_summary());
    println!("Forecast table:");
    for (probability, date) in report.generate_table() {
        println!("{probability:>3}% | on or before {}", date.format("%d %B, %Y"));
    }
    report.report_create(&format!("{}/forecast.md", args.output_path))?;

    if let Some(deadline) = config.required_completion_date {
        match tickets_per_week_for_deadline(remaining, deadline, report.today) {
            Some(rate) => println!(
                "\nTo complete the remaining {remaining} tickets by {deadline}, the team needs \
                 to complete {rate:.2} tickets per week (a takt time of {:.2} hours per ticket).",
                config.available_hours_per_week / rate
            ),
            None => println!(
                "\nThe required completion date {deadline} is not in the future; \
                 no demand rate was computed."
            ),
        }
    }

    Ok(())
}

async fn load_inputs(args: &Args) -> Result<(ForecastConfig, Records)> {
    let multi_progress = MultiProgress::default();
    let config_pb = multi_progress.add_stage(format!("Read config `{}` ...", args.config_path));
    let tickets_pb =
        multi_progress.add_stage(format!("Read ticket export `{}` ...", args.tickets_path));

    let (config, tickets_json) = futures::join!(
        async {
            let config = ForecastConfig::from_config(&args.config_path)?;
            config_pb.finish_with_message(format!(
                "✅ Completed parsing config `{}`",
                args.config_path
            ));
            Ok::<_, Box<dyn std::error::Error>>(config)
        },
        async {
            fs::read_to_string(&args.tickets_path).map_err(|error| {
                format!(
                    "the ticket export file `{}` can't be read: {error}",
                    args.tickets_path
                )
            })
        },
    );
    let (config, tickets_json) = (config?, tickets_json?);

    let records = ingest::jira::parse(&tickets_json, &config.wip_mapping)?;
    tickets_pb.finish_with_message(format!(
        "✅ Completed decoding `{}` (find {} transition records)",
        args.tickets_path,
        records.len()
    ));
    Ok((config, records))
}

fn export_json(output_path: &str, name: &str, json: String) -> Result<()> {
    fs::write(format!("{output_path}/{name}"), json).map_err(|error| {
        format!("the export file `{output_path}/{name}` can't be written: {error}").into()
    })
}
