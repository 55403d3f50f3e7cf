const DEFAULT_AFTER_HELP: &str = "Refer to the crate's documentation for further help";

#[derive(clap::Parser, Debug)]
#[command(after_help=DEFAULT_AFTER_HELP)]
pub struct Args {
    /// Quiet mode / Exit code as schedulability result
    ///
    /// When enabled, a zero exit code means the run completed schedulable
    /// (or with no deadline miss), a one means a miss/non-schedulable
    /// verdict, any other code means that an error has happened.
    #[arg(short='q', default_value="false", action=clap::ArgAction::SetTrue)]
    pub quiet: bool,

    /// Print the trace and info record as JSON instead of a table
    #[arg(long="json", default_value="false", action=clap::ArgAction::SetTrue)]
    pub json: bool,

    #[command(flatten, next_help_heading="Taskset Specification")]
    pub taskset_args: TasksetArgs,
}

#[derive(clap::Args, Debug)]
pub struct TasksetArgs {
    /// Taskset info file (JSON)
    #[arg(short='i', value_name="TASKSET FILE")]
    pub taskset_file: String,
}
