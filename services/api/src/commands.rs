use crate::infra::load_risk_services;
use clap::Args;
use reoffending_risk::config::AppConfig;
use reoffending_risk::error::AppError;
use reoffending_risk::offences::{OffenceTable, WeightingKind};
use reoffending_risk::AssessmentRequest;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// JSON assessment request to score
    #[arg(long)]
    pub(crate) request: PathBuf,
    /// Override the configured model parameter document
    #[arg(long)]
    pub(crate) parameters: Option<PathBuf>,
    /// Override the configured offence weighting table
    #[arg(long)]
    pub(crate) offences: Option<PathBuf>,
    /// Print compact JSON instead of pretty-printed output
    #[arg(long)]
    pub(crate) compact: bool,
}

#[derive(Args, Debug)]
pub(crate) struct OffenceCheckArgs {
    /// Offence weighting CSV to validate
    #[arg(long)]
    pub(crate) path: PathBuf,
}

pub(crate) fn run_assessment(args: AssessArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(parameters) = args.parameters {
        config.reference_data.model_parameters = parameters;
    }
    if let Some(offences) = args.offences {
        config.reference_data.offence_table = offences;
    }

    let services = load_risk_services(&config.reference_data)?;
    let request: AssessmentRequest =
        serde_json::from_reader(BufReader::new(File::open(&args.request)?))?;
    let outcome = services.engine.assess(&request);

    let rendered = if args.compact {
        serde_json::to_string(&outcome)?
    } else {
        serde_json::to_string_pretty(&outcome)?
    };
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_offence_check(args: OffenceCheckArgs) -> Result<(), AppError> {
    let table = OffenceTable::from_path(&args.path)?;
    let summary = OffenceTableSummary::of(&table);

    println!("Offence table {} is valid", args.path.display());
    println!("  Offence codes: {}", summary.offences);
    println!("  Violent: {}", summary.violent);
    println!("  Sexual: {}", summary.sexual);
    println!("  Indecent image: {}", summary.indecent_image);
    println!("  General weighting: {}", summary.general_weighted);
    println!("  Violent weighting: {}", summary.violent_weighted);
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct OffenceTableSummary {
    offences: usize,
    violent: usize,
    sexual: usize,
    indecent_image: usize,
    general_weighted: usize,
    violent_weighted: usize,
}

impl OffenceTableSummary {
    fn of(table: &OffenceTable) -> Self {
        table.iter().fold(Self::default(), |mut summary, offence| {
            summary.offences += 1;
            summary.violent += usize::from(offence.flags.violent);
            summary.sexual += usize::from(offence.flags.sexual);
            summary.indecent_image += usize::from(offence.flags.indecent_image);
            summary.general_weighted +=
                usize::from(offence.weighting(WeightingKind::General).is_some());
            summary.violent_weighted +=
                usize::from(offence.weighting(WeightingKind::Violent).is_some());
            summary
        })
    }
}
