use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use wf_format::{FormatError, Material, Model, DEFAULT_MATERIAL_NAME};

use crate::{
    config::AssetPaths,
    material::mtl,
    mesh::{
        obj::{self, ObjMeta, ParserError},
        tangent,
    },
    resources::{ResourceSource, TransferError},
};

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error("Resource {0} is not valid UTF-8")]
    Encoding(PathBuf),
    #[error("Failed to parse model {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParserError,
    },
    #[error("Failed to parse meta file {path}: {source}")]
    Meta {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("Mesh `{mesh}` uses material `{material}`, which {library} does not define")]
    DanglingMaterial {
        mesh: String,
        material: String,
        library: PathBuf,
    },
}

/// Everything a load needs, passed explicitly instead of living in globals.
#[derive(Clone, Copy)]
pub struct LoadContext<'a> {
    pub source: &'a dyn ResourceSource,
    pub paths: &'a AssetPaths,
}

/// Loads a model and its material library.
///
/// `model` is resolved against the models directory and the library, if one is referenced,
/// against the directory of the model. The model is returned once both are parsed; without a
/// library every mesh uses the synthesized default material.
pub async fn load_model(ctx: &LoadContext<'_>, model: &Path, meta: &ObjMeta) -> Result<Model, LoadError> {
    let path = ctx.paths.model_path(model);
    let source = fetch_text(ctx, &path).await?;
    let name = model
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("model");

    info!("Loading mesh: {}", path.display());
    let output = obj::parse(&source, name, *meta).map_err(|source| LoadError::Parse {
        path: path.clone(),
        source,
    })?;

    let mut model = Model::new(output.meshes);
    model.materials = output.materials;

    if let Some(library) = output.material_library {
        let library_path = ctx.paths.material_path(&path, &library);
        info!("Loading materials: {}", library_path.display());

        let source = fetch_text(ctx, &library_path).await?;
        model.materials = mtl::parse(&source);
        resolve_materials(&mut model, &library_path)?;
    }

    for mesh in &mut model.meshes {
        let normal_mapped = mesh
            .material_name
            .as_deref()
            .and_then(|name| model.materials.get(name))
            .map_or(false, |material| material.normal_texture.is_some());

        if meta.calculate_tangents || normal_mapped {
            tangent::calculate_tangents(mesh)?;
        }
    }

    debug!(
        "Loaded {} meshes, {} triangles and {} materials from {}",
        model.meshes.len(),
        model.triangle_count(),
        model.materials.len(),
        path.display()
    );
    Ok(model)
}

/// Looks up the import options of a model through the resource source.
///
/// Tries `<stem>.toml` next to the model, then the folder scoped `obj.toml`. Returns `None`
/// when neither exists.
pub async fn load_meta(ctx: &LoadContext<'_>, model: &Path) -> Result<Option<ObjMeta>, LoadError> {
    let path = ctx.paths.model_path(model);
    let candidates = [path.with_extension("toml"), path.with_file_name("obj.toml")];

    for candidate in &candidates {
        match ctx.source.fetch(candidate).await {
            Ok(data) => {
                info!("Using meta file `{}`", candidate.display());
                let meta = ObjMeta::from_slice(&data).map_err(|source| LoadError::Meta {
                    path: candidate.clone(),
                    source,
                })?;
                return Ok(Some(meta));
            }
            Err(TransferError::NotFound(_)) => continue,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(None)
}

// meshes of a source without any `usemtl` fall back to the default material
fn resolve_materials(model: &mut Model, library: &Path) -> Result<(), LoadError> {
    let mut needs_default = false;

    for mesh in &mut model.meshes {
        if mesh.material_name.is_none() {
            warn!("Mesh `{}` has no material, using the default material", mesh.name);
            mesh.material_name = Some(DEFAULT_MATERIAL_NAME.into());
            needs_default = true;
            continue;
        }

        if let Some(material) = &mesh.material_name {
            if !model.materials.contains_key(material) {
                return Err(LoadError::DanglingMaterial {
                    mesh: mesh.name.clone(),
                    material: material.clone(),
                    library: library.to_owned(),
                });
            }
        }
    }

    if needs_default && !model.materials.contains_key(DEFAULT_MATERIAL_NAME) {
        model.insert_material(Material::default_named());
    }

    Ok(())
}

async fn fetch_text(ctx: &LoadContext<'_>, path: &Path) -> Result<String, LoadError> {
    let bytes = ctx.source.fetch(path).await?;
    String::from_utf8(bytes).map_err(|_| LoadError::Encoding(path.to_owned()))
}
