use anyhow::{Context, Result};
use futures::executor::block_on;
use log::{debug, error, info, warn};
use std::{
    fs,
    path::{Path, PathBuf},
};
use structopt::StructOpt;
use walkdir::WalkDir;
use wf_asset::{
    load_model,
    mesh::obj::{self, ObjMeta},
    utils, AssetConfig, AssetPaths, FsSource, LoadContext,
};

// Cli arguments
#[derive(StructOpt, Debug)]
#[structopt(name = "wf_asset")]
struct CliArgs {
    /// Specify the input folder
    #[structopt(parse(from_os_str))]
    input: PathBuf,
    /// Output directory, to place the converted files in
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    output: Option<PathBuf>,
    /// Directory textures are resolved against
    #[structopt(short = "t", long = "textures", parse(from_os_str))]
    textures: Option<PathBuf>,
    /// Config file with default directories
    #[structopt(short = "c", long = "config", parse(from_os_str))]
    config: Option<PathBuf>,
    /// Output debug info
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
}

/// Happens during setup
#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("Input folder does not exist: {0}")]
    InputFolderNonExistant(PathBuf),
    #[error("No output folder given, neither as argument nor in the config")]
    MissingOutput,
    #[error("{0} of {1} models could not be converted")]
    FailedModels(usize, usize),
}

fn main() -> Result<()> {
    let args = CliArgs::from_args();

    if !args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    } else {
        env_logger::Builder::new()
            .filter(None, log::LevelFilter::Debug)
            .init();
    }

    prepare(args)
}

fn prepare(args: CliArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => AssetConfig::parse(path)
            .with_context(|| format!("Could not load config: {}", path.display()))?,
        None => AssetConfig {
            textures_dir: args.input.clone(),
            ..AssetConfig::default()
        },
    };
    config.models_dir = args.input.clone();
    if let Some(textures) = args.textures {
        config.textures_dir = textures;
    }
    if let Some(output) = args.output {
        config.output_dir = Some(output);
    }

    let output_path = config.output_dir.clone().ok_or(CliError::MissingOutput)?;
    let input_path = config.models_dir.clone();
    if !input_path.is_dir() {
        return Err(CliError::InputFolderNonExistant(input_path).into());
    }

    let paths = config.paths();
    let (mut converted, mut failed) = (0, 0);

    for entry in WalkDir::new(&input_path) {
        let path = match &entry {
            Err(err) => {
                warn!("Error parsing path: {}", err);
                continue;
            }
            Ok(entry) => entry.path(),
        };

        if path.is_dir() {
            continue;
        }

        // check extension
        match path.extension().and_then(|x| x.to_str()) {
            Some(extension) => match extension.to_ascii_lowercase().as_ref() {
                "obj" => match convert(path, &input_path, &output_path, &paths) {
                    Ok(target) => {
                        info!("Converted `{}` to `{}`", path.display(), target.display());
                        converted += 1;
                    }
                    Err(err) => {
                        error!("Could not convert `{}`: {:#}", path.display(), err);
                        failed += 1;
                    }
                },
                "mtl" | "toml" => debug!("Ignored {} file: {}", extension, path.display()),
                _ => warn!("Could not handle path: {}", path.display()),
            },
            None => warn!(
                "Ignored file \"{}\", because no file extension was found.",
                path.display()
            ),
        }
    }

    if failed > 0 {
        return Err(CliError::FailedModels(failed, converted + failed).into());
    }

    Ok(())
}

fn convert(path: &Path, input_path: &Path, output_path: &Path, paths: &AssetPaths) -> Result<PathBuf> {
    info!("Processing Wavefront `.obj`-file: `{}`", path.display());
    let meta: ObjMeta = obj::parse_meta(path)?;

    let relative = path
        .strip_prefix(input_path)
        .context("Error handling output path: stripping prefix")?;

    let source = FsSource;
    let ctx = LoadContext {
        source: &source,
        paths,
    };
    let model = block_on(load_model(&ctx, relative, &meta))?;
    model.validate().context("Loaded model is inconsistent")?;

    // creating the output folder of the input file in the same structure
    let target = output_path.join(relative);
    let local_output_folder = target.parent().unwrap_or(output_path);
    fs::create_dir_all(local_output_folder).with_context(|| {
        format!(
            "Output folder structure could not be created: {}",
            local_output_folder.display()
        )
    })?;

    let file_name = utils::file_name(path).context("No file stem found")?;
    let target = utils::combine_path(local_output_folder, file_name, "wfm");
    let data = model.to_bytes().context("Could not serialize Model")?;
    utils::write_file(&target, &data)?;

    Ok(target)
}
