use std::fs::canonicalize;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::cli::args::Args;
use crate::config::parse_job_config;
use crate::plan::execute_job;

pub mod args;

pub fn run() -> Result<()> {
    let args = Args::parse();

    let config_path = canonicalize(&args.config)?;
    let mut job = parse_job_config(&config_path)?;
    if let Some(height) = args.height {
        job.height = height;
    }

    println!("Job file: {:?}", &config_path);
    println!("Cell parameters:");
    println!("\tName: {}", job.name());
    println!("\tTechnology: {:?}", &job.tech);
    println!("\tPlacement: {:?}", &job.placement);
    println!("\tFold height: {}", job.height);
    println!("\tPlacer: {:?}", job.placer);

    let work_dir = args.output_dir.unwrap_or_else(|| PathBuf::from("build"));
    std::fs::create_dir_all(&work_dir)?;
    let work_dir = canonicalize(work_dir)?;

    let path = execute_job(&job, &work_dir)?;
    println!("Layout saved to: {:?}\n", &path);

    Ok(())
}
