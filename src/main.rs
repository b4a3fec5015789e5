use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;

use campaign_selector::{
    load_export_path, run, write_audit_path, write_campaign_path, write_ledger_path,
    write_ledger_template_path, Ledger, RunContext,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("run") => run_command(&args[2..]),
        Some("template") => template_command(&args[2..]),
        _ => {
            print_usage();
            std::process::exit(2);
        }
    }
}

fn print_usage() {
    eprintln!("campaign-selector {}", campaign_selector::VERSION);
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  campaign-selector run <export.csv> [--history <ledger.csv>] [--out <dir>] [--json]");
    eprintln!("  campaign-selector template [--out <dir>]");
}

struct RunArgs {
    export: PathBuf,
    history: Option<PathBuf>,
    out_dir: PathBuf,
    json: bool,
}

fn parse_run_args(args: &[String]) -> Result<RunArgs> {
    let mut export = None;
    let mut history = None;
    let mut out_dir = PathBuf::from(".");
    let mut json = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--history" => {
                let value = iter.next().context("--history needs a file path")?;
                history = Some(PathBuf::from(value));
            }
            "--out" => {
                let value = iter.next().context("--out needs a directory path")?;
                out_dir = PathBuf::from(value);
            }
            "--json" => json = true,
            other if export.is_none() && !other.starts_with("--") => {
                export = Some(PathBuf::from(other));
            }
            other => bail!("unexpected argument: {}", other),
        }
    }

    Ok(RunArgs {
        export: export.context("missing required <export.csv> argument")?,
        history,
        out_dir,
        json,
    })
}

fn run_command(args: &[String]) -> Result<()> {
    let args = parse_run_args(args)?;

    let source_filename = args
        .export
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.export.display().to_string());
    let ctx = RunContext::now(&source_filename);

    // 1. Load inputs; any schema or ledger validation failure aborts here,
    // before anything is written.
    let records = load_export_path(&args.export)?;
    let ledger = match &args.history {
        Some(path) => Ledger::from_path(path)?,
        None => Ledger::empty(),
    };

    if !args.json {
        println!("📂 Loaded {} export records from {}", records.len(), source_filename);
        match &args.history {
            Some(path) => println!("🗃️  Loaded ledger with {} entries from {}", ledger.len(), path.display()),
            None => println!("🗃️  No ledger supplied, starting from an empty history"),
        }
    }

    // 2. Run the pipeline.
    let outputs = run(&records, &ledger, &ctx);

    // 3. Write the three artifacts.
    let campaign_path = args
        .out_dir
        .join(format!("1_campaign_wa_{}.csv", ctx.run_date));
    let ledger_path = args.out_dir.join(format!("sent_history_{}.csv", ctx.run_date));
    let audit_path = args
        .out_dir
        .join(format!("audit_campaign_{}-{}.csv", ctx.run_date, ctx.run_hhmm));

    write_campaign_path(&campaign_path, &outputs.campaign)?;
    write_ledger_path(&ledger_path, &outputs.ledger)?;
    write_audit_path(&audit_path, &outputs.audit)?;

    // 4. Report.
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outputs.summary)
                .context("failed to encode run summary")?
        );
    } else {
        let s = &outputs.summary;
        println!();
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("Input records:        {}", s.total_input);
        println!("Removed (cooldown):   {}", s.removed_cooldown);
        println!("Removed (result):     {}", s.removed_result);
        println!("Removed (wrapup):     {}", s.removed_wrapup);
        println!("Removed (phone):      {}", s.removed_phone);
        println!("Selected:             {}", s.selected);
        println!("New ledger entries:   {}", s.new_ledger_entries);
        println!("Campaign records:     {}", s.campaign_records);
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!();
        println!("✓ {}", campaign_path.display());
        println!("✓ {}", ledger_path.display());
        println!("✓ {}", audit_path.display());
    }

    Ok(())
}

fn template_command(args: &[String]) -> Result<()> {
    let mut out_dir = PathBuf::from(".");

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--out" => {
                let value = iter.next().context("--out needs a directory path")?;
                out_dir = PathBuf::from(value);
            }
            other => bail!("unexpected argument: {}", other),
        }
    }

    let path = out_dir.join("ledger_template.csv");
    write_ledger_template_path(&path)?;
    println!("✓ Wrote empty ledger template to {}", path.display());

    Ok(())
}
