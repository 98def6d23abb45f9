use std::{
    io,
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre as ey;
use ey::eyre::{bail, eyre, Context};
use strata_content::{
    project::{FileSystemProject, ASSETS_FOLDER},
    usage::ProjectProvider,
    AssetId, AssetManager, DeleteOutcome, Directories,
};
use strata_shared::log::{self, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CommandLineArguments {
    /// Folder of the project
    #[arg(short, long, default_value = ".")]
    project: PathBuf,

    /// Folder containing the images of the standard assets
    #[arg(long, default_value = "standard_assets")]
    standard_assets: PathBuf,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Creates the project folders and the standard assets
    Init {
        /// Name of the project
        #[arg(short, long, default_value = "project")]
        name: String,
    },
    /// Lists the assets of the project
    List,
    ImportTexture {
        file: PathBuf,
    },
    ImportModel {
        file: PathBuf,
    },
    NewTerrain {
        name: String,

        /// Number of vertices along one side of the terrain
        #[arg(short, long, default_value = "180")]
        resolution: u32,

        #[arg(short, long, default_value = "1200")]
        size: u32,
    },
    NewMaterial {
        name: String,
    },
    NewWater {
        name: String,

        #[arg(short, long, default_value = "1600")]
        size: u32,
    },
    NewSkybox {
        name: String,

        /// Texture ids of the faces in the order +X -X +Y -Y +Z -Z
        #[arg(num_args = 6, required = true)]
        faces: Vec<String>,
    },
    /// Deletes an asset unless it is used by a scene or another asset
    Delete {
        id: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn main() -> ey::Result<()> {
    color_eyre::install()?;
    let command_line_arguments = CommandLineArguments::parse();

    // Setup logging
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                strata_shared::chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(command_line_arguments.log_level.into())
        .chain(io::stdout())
        .apply()
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;

    let assets_path = command_line_arguments.project.join(ASSETS_FOLDER);
    match &command_line_arguments.command {
        Command::Init { name } => {
            let project_file = command_line_arguments.project.join(strata_content::project::PROJECT_FILE);
            if !project_file.exists() {
                FileSystemProject::create(&command_line_arguments.project, name).wrap_err("Failed to create the project")?;
            }
            let directories = Directories::create_all_dir(&assets_path, &command_line_arguments.standard_assets)
                .wrap_err("Failed to create the asset folder")?;
            let mut asset_manager = AssetManager::new(directories).wrap_err("Failed to open the asset folder")?;
            asset_manager.load_all().wrap_err("Failed to load the assets")?;

            let report = asset_manager.create_standard_assets();
            for failure in &report.failures {
                warn!("Standard asset '{}' is not available: {}", failure.id, failure.error);
            }
            asset_manager.save_all().wrap_err("Failed to save the standard assets")?;
            info!("Initialized project in '{}'", command_line_arguments.project.display());
        }
        Command::List => {
            let asset_manager = open_asset_manager(&assets_path, &command_line_arguments.standard_assets)?;
            for asset in asset_manager.index().iter() {
                println!("{}\t{:?}\t{}", asset.id(), asset.asset_type(), asset.name());
            }
        }
        Command::ImportTexture { file } => {
            let mut asset_manager = open_asset_manager(&assets_path, &command_line_arguments.standard_assets)?;
            let id = asset_manager
                .create_texture_asset(file)
                .wrap_err_with(|| format!("Failed to import texture {file:?}"))?
                .id()
                .clone();
            save(&mut asset_manager, &id)?;
        }
        Command::ImportModel { file } => {
            let mut asset_manager = open_asset_manager(&assets_path, &command_line_arguments.standard_assets)?;
            let id = asset_manager
                .create_model_asset(file)
                .wrap_err_with(|| format!("Failed to import model {file:?}"))?
                .id()
                .clone();
            save(&mut asset_manager, &id)?;
        }
        Command::NewTerrain { name, resolution, size } => {
            let mut asset_manager = open_asset_manager(&assets_path, &command_line_arguments.standard_assets)?;
            let id = asset_manager
                .create_terrain_asset(name, *resolution, *size)
                .wrap_err("Failed to create terrain")?
                .id()
                .clone();
            save(&mut asset_manager, &id)?;
        }
        Command::NewMaterial { name } => {
            let mut asset_manager = open_asset_manager(&assets_path, &command_line_arguments.standard_assets)?;
            let id = asset_manager
                .create_material_asset(name)
                .wrap_err("Failed to create material")?
                .id()
                .clone();
            save(&mut asset_manager, &id)?;
        }
        Command::NewWater { name, size } => {
            let mut asset_manager = open_asset_manager(&assets_path, &command_line_arguments.standard_assets)?;
            let id = asset_manager
                .create_water_asset(name, *size)
                .wrap_err("Failed to create water")?
                .id()
                .clone();
            save(&mut asset_manager, &id)?;
        }
        Command::NewSkybox { name, faces } => {
            let mut asset_manager = open_asset_manager(&assets_path, &command_line_arguments.standard_assets)?;
            let faces: [AssetId; 6] = faces
                .iter()
                .map(|face| AssetId::from(face.as_str()))
                .collect::<Vec<_>>()
                .try_into()
                .map_err(|faces: Vec<AssetId>| eyre!("Expected 6 faces but got {}", faces.len()))?;
            for face in &faces {
                if asset_manager.find(face).is_none() {
                    warn!("Skybox face '{face}' is not an asset of the project");
                }
            }
            let id = asset_manager
                .create_skybox_asset(name, faces)
                .wrap_err("Failed to create skybox")?
                .id()
                .clone();
            save(&mut asset_manager, &id)?;
        }
        Command::Delete { id } => {
            let mut asset_manager = open_asset_manager(&assets_path, &command_line_arguments.standard_assets)?;
            let project = FileSystemProject::open(&command_line_arguments.project).wrap_err("Failed to open the project")?;
            info!("Checking the {} scenes of project '{}'", project.current().scenes.len(), project.current().name);
            let outcome = asset_manager
                .delete_asset(&AssetId::from(id.as_str()), &project)
                .wrap_err_with(|| format!("Failed to delete asset '{id}'"))?;
            match outcome {
                DeleteOutcome::Deleted => info!("Deleted asset '{id}'"),
                DeleteOutcome::Blocked(conflict) => bail!("{}\n{}", conflict.message(), conflict.details()),
            }
        }
    }
    Ok(())
}

fn open_asset_manager(assets_path: &Path, standard_assets_path: &Path) -> ey::Result<AssetManager> {
    let directories = Directories::new(assets_path, standard_assets_path);
    let mut asset_manager = AssetManager::new(directories).wrap_err("Failed to open the asset folder. Run 'init' first")?;
    asset_manager.load_all().wrap_err("Failed to load the assets")?;
    Ok(asset_manager)
}

fn save(asset_manager: &mut AssetManager, id: &AssetId) -> ey::Result<()> {
    asset_manager.save_all().wrap_err("Failed to save the assets")?;
    if let Some(asset) = asset_manager.find(id) {
        info!("{}\t{:?}\t{}", asset.id(), asset.asset_type(), asset.file().display());
    }
    Ok(())
}
