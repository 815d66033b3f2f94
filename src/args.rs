use clap::{Parser, Subcommand};

/// Cleans wordsum survey spreadsheets and compares the scores of parties, periods and elections.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,

    /// (file path, optional) A JSON file with the analysis settings: survey years, periods, elections.
    /// Every setting that is not given keeps its default value.
    #[clap(short, long, value_parser, global = true)]
    pub config: Option<String>,

    /// (default: the first worksheet) When reading an Excel file, the name of the worksheet to use.
    #[clap(long, value_parser, global = true)]
    pub worksheet: Option<String>,

    /// (directory, default charts) Where the SVG charts are written. Overrides the configuration.
    #[clap(long, value_parser, global = true)]
    pub chart_dir: Option<String>,

    /// If passed as an argument, no chart is drawn.
    #[clap(long, takes_value = false, global = true)]
    pub no_charts: bool,

    /// (file path, 'stdout' or empty) If specified, the group statistics are written in JSON format to the
    /// given location.
    #[clap(long, value_parser, global = true)]
    pub summary_out: Option<String>,

    /// (file path) A previously saved report. If provided, the printed report must match it exactly.
    #[clap(short, long, value_parser, global = true)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard error.
    #[clap(long, takes_value = false, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Drops the rows with non-answers, the years outside the survey and the scores out of range,
    /// then writes the cleaned data and a copy with simplified party labels.
    Clean {
        #[clap(short, long, value_parser, default_value = "data.xlsx")]
        input: String,
        #[clap(long, value_parser, default_value = "clean-data.xlsx")]
        clean_out: String,
        #[clap(long, value_parser, default_value = "simple-data.xlsx")]
        simple_out: String,
    },
    /// Drops the rows with a non-answer in the party or the education columns, then writes the cleaned
    /// data and a copy with simplified party labels.
    CleanEduc {
        #[clap(short, long, value_parser, default_value = "educ-data.xlsx")]
        input: String,
        #[clap(long, value_parser, default_value = "clean-educ-data.xlsx")]
        clean_out: String,
        #[clap(long, value_parser, default_value = "simple-educ-data.xlsx")]
        simple_out: String,
    },
    /// Compares democrats, republicans and independents before and after 2016.
    Periods {
        #[clap(short, long, value_parser, default_value = "simple-data.xlsx")]
        input: String,
    },
    /// Same as periods, with the seven-point party scale.
    Detailed {
        #[clap(short, long, value_parser, default_value = "clean-data.xlsx")]
        input: String,
    },
    /// Compares the voters of the candidates of each presidential election.
    Elections {
        #[clap(short, long, value_parser, default_value = "pres-data.xlsx")]
        input: String,
    },
    /// Education levels by party.
    Education {
        #[clap(short, long, value_parser, default_value = "simple-educ-data.xlsx")]
        input: String,
    },
}

impl Command {
    /// The name of the subcommand, as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Clean { .. } => "clean",
            Command::CleanEduc { .. } => "clean-educ",
            Command::Periods { .. } => "periods",
            Command::Detailed { .. } => "detailed",
            Command::Elections { .. } => "elections",
            Command::Education { .. } => "education",
        }
    }
}
