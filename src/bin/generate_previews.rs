//! Render preset preview images in parallel
//!
//! Renders every preset in the built-in catalog (or a JSON catalog file) to
//! `<out>/<n>.png`, one file per preset in catalog order. Exits non-zero if
//! any preset fails.

use clap::Parser;
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use textrender::text::font_db::FontDatabase;
use textrender::{builtin_presets, FontContext, OutputFormat, TextPreset, TextRenderer};

/// Render preset preview images in parallel
#[derive(Parser, Debug)]
#[command(name = "generate_previews", version, about)]
struct Args {
  /// Output directory
  #[arg(long, short, default_value = "previews")]
  out: PathBuf,

  /// JSON catalog file (array of presets); defaults to the built-in catalog
  #[arg(long)]
  catalog: Option<PathBuf>,

  /// Number of parallel renders
  #[arg(long, short, default_value_t = num_cpus::get())]
  jobs: usize,

  /// Output format
  #[arg(long, value_parser = parse_format, default_value = "png")]
  format: OutputFormat,

  /// Additional font directory to load before system fonts are consulted
  #[arg(long)]
  font_dir: Option<PathBuf>,
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
  match s.to_ascii_lowercase().as_str() {
    "png" => Ok(OutputFormat::Png),
    "webp" => Ok(OutputFormat::WebP),
    other => Err(format!("unknown format '{other}' (expected png or webp)")),
  }
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Vec<TextPreset>, String> {
  match path {
    None => Ok(builtin_presets().to_vec()),
    Some(path) => {
      let data = fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
      serde_json::from_str(&data).map_err(|e| format!("failed to parse {}: {e}", path.display()))
    }
  }
}

fn build_font_context(font_dir: Option<&PathBuf>) -> FontContext {
  match font_dir {
    None => FontContext::new(),
    Some(dir) => {
      let mut db = FontDatabase::new();
      db.load_fonts_dir(dir);
      FontContext::with_database(Arc::new(db))
    }
  }
}

fn main() {
  env_logger::init();
  let args = Args::parse();

  let presets = match load_catalog(args.catalog.as_ref()) {
    Ok(presets) => presets,
    Err(e) => {
      eprintln!("error: {e}");
      std::process::exit(2);
    }
  };
  if presets.is_empty() {
    eprintln!("error: catalog is empty");
    std::process::exit(2);
  }

  if let Err(e) = fs::create_dir_all(&args.out) {
    eprintln!("error: failed to create {}: {e}", args.out.display());
    std::process::exit(2);
  }

  let renderer = TextRenderer::builder()
    .font_context(build_font_context(args.font_dir.as_ref()))
    .format(args.format)
    .build();
  if !renderer.font_context().has_fonts() {
    eprintln!("error: no fonts available (install system fonts or pass --font-dir)");
    std::process::exit(2);
  }

  let pool = rayon::ThreadPoolBuilder::new()
    .num_threads(args.jobs.max(1))
    .build()
    .expect("build thread pool");

  let start = Instant::now();
  let results: Vec<(String, Result<usize, String>)> = pool.install(|| {
    presets
      .par_iter()
      .enumerate()
      .map(|(i, preset)| {
        let path = args.out.join(format!("{}.{}", i + 1, args.format.extension()));
        let result = renderer
          .render_preview(preset)
          .map_err(|e| e.to_string())
          .and_then(|bytes| {
            let size = bytes.len();
            fs::write(&path, bytes).map_err(|e| e.to_string())?;
            Ok(size)
          });
        (preset.name.clone(), result)
      })
      .collect()
  });

  let mut failures = 0;
  for (name, result) in &results {
    match result {
      Ok(size) => println!("ok    {name} ({size} bytes)"),
      Err(e) => {
        failures += 1;
        eprintln!("fail  {name}: {e}");
      }
    }
  }
  println!(
    "{} rendered, {} failed in {:.2}s",
    results.len() - failures,
    failures,
    start.elapsed().as_secs_f64()
  );

  if failures > 0 {
    std::process::exit(1);
  }
}
