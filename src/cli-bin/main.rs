use sched_sim_core::prelude::*;

pub mod args;

use args::Args;

fn main() {
    let args = match <Args as clap::Parser>::try_parse() {
        Ok(args) => args,
        Err(err) => {
            use clap::error::ErrorKind::*;

            let exit_code = match err.kind() {
                DisplayHelp |
                DisplayHelpOnMissingArgumentOrSubcommand |
                DisplayVersion => 0,
                _ => 2,
            };

            err.print().unwrap();
            std::process::exit(exit_code);
        },
    };

    let quiet = args.quiet;
    match main_wo_exit_code(args) {
        Ok(schedulable) => {
            if quiet {
                std::process::exit(if schedulable { 0 } else { 1 });
            }
        },
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        },
    };
}

fn main_wo_exit_code(args: Args) -> Result<bool, Box<dyn std::error::Error>> {
    let task_info = read_task_info(&args.taskset_args.taskset_file)?;
    let (trace, info) = compute(&task_info)?;

    if args.json {
        print_json(&trace, &info)?;
    } else if !args.quiet {
        print_table(&trace, &info);
    }

    let schedulable = info.missed_task_num.is_none()
        && !matches!(info.schedulability, Some(Schedulability::No));

    Ok(schedulable)
}

fn print_json(trace: &Trace, info: &Info) -> Result<(), Box<dyn std::error::Error>> {
    #[derive(serde::Serialize)]
    struct Output<'a> {
        trace: &'a [Segment],
        info: &'a Info,
    }

    let output = Output { trace: trace.segments(), info };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_table(trace: &Trace, info: &Info) {
    println!("{:>6} {:>10} {:>10} {:>10}", "task", "start", "end", "freq");
    for segment in trace.segments() {
        println!(
            "{:>6} {:>10.4} {:>10.4} {:>10.4}",
            segment.task_id, segment.start, segment.end, segment.frequency
        );
    }

    if let Some(schedulability) = info.schedulability {
        println!("schedulability: {schedulability:?}");
    }
    if let Some(task_num) = info.missed_task_num {
        println!("missed_task_num: {task_num}");
    }
    if let Some(miss_occurance) = info.miss_occurance {
        println!("miss_occurance: {miss_occurance:.4}");
    }
    if let Some(warning) = &info.warning {
        println!("warning: {warning}");
    }
}
