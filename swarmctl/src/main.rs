use std::fs;
use std::io;

use clap::{crate_authors, crate_description, crate_version, CommandFactory, Parser};
use clap_complete::generate;
use eyre::Result;
use tracing::{info, trace};

use swarmctl::{
    load_engine, show_frame, show_heatmap, show_stats, show_summary, show_timeline, Config, Opts,
    Output, SubCommand,
};
use swarmviz_common::{init_logging, ConfigFile};

/// Binary name, using a different binary name
pub const NAME: &str = env!("CARGO_BIN_NAME");
/// Binary version
pub const VERSION: &str = crate_version!();
/// Authors
pub const AUTHORS: &str = crate_authors!();

fn main() -> Result<()> {
    let opts = Opts::parse();

    // Initialise logging.
    //
    init_logging(NAME, opts.tree, opts.log_file.clone())?;

    // Config only has the surface sizes, defaults are fine.
    //
    let cfg = ConfigFile::<Config>::load_or_default(opts.config.as_deref())?;
    trace!("config from {:?}", cfg.source());

    // Banner
    //
    banner()?;

    let output = Output::from(&opts);
    let res = handle_subcmd(&opts, cfg.inner(), output)?;

    match &opts.output {
        Some(fname) => {
            info!("Writing into {:?}", fname);
            fs::write(fname, res)?;
        }
        None if !res.is_empty() => println!("{}", res),
        None => (),
    }
    Ok(())
}

pub fn handle_subcmd(opts: &Opts, cfg: &Config, output: Output) -> Result<String> {
    let res = match &opts.subcmd {
        // Handle `summary file`
        //
        SubCommand::Summary(fopts) => {
            trace!("summary");

            let engine = load_engine(&fopts.file, cfg)?;
            show_summary(&engine, output)?
        }

        // Handle `timeline file`
        //
        SubCommand::Timeline(fopts) => {
            trace!("timeline");

            let engine = load_engine(&fopts.file, cfg)?;
            show_timeline(&engine, output)?
        }

        // Handle `frame (-i N|-a TP) file`
        //
        SubCommand::Frame(fopts) => {
            trace!("frame");

            let engine = load_engine(&fopts.file, cfg)?;
            show_frame(&engine, fopts, output)?
        }

        // Handle `heatmap file`
        //
        SubCommand::Heatmap(fopts) => {
            trace!("heatmap");

            let engine = load_engine(&fopts.file, cfg)?;
            show_heatmap(&engine, output)?
        }

        // Handle `stats (-i N|-a TP) file`
        //
        SubCommand::Stats(sopts) => {
            trace!("stats");

            let engine = load_engine(&sopts.file, cfg)?;
            show_stats(&engine, sopts, output)?
        }

        // Standalone completion generation
        //
        // NOTE: you can generate UNIX shells completion on Windows and vice-versa.  Not worth
        //       trying to limit depending on the OS.
        //
        SubCommand::Completion(copts) => {
            let generator = copts.shell;
            generate(generator, &mut Opts::command(), NAME, &mut io::stdout());
            String::new()
        }

        // Standalone `version` command
        //
        SubCommand::Version => {
            eprintln!("{}", version());
            eprintln!("Modules: ");
            eprintln!("\t{}", swarmviz_common::version());
            eprintln!("\t{}", swarmviz_formats::version());
            eprintln!("\t{}", swarmviz_engine::version());
            String::new()
        }
    };
    Ok(res)
}

/// Return our version number
///
#[inline]
pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}

/// Display banner
///
fn banner() -> Result<()> {
    Ok(eprintln!(
        r##"
{}/{} by {}
{}
"##,
        NAME,
        VERSION,
        AUTHORS,
        crate_description!()
    ))
}
