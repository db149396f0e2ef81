use std::{cell::Cell, path::Path, rc::Rc};

use futures::executor::block_on;
use wf_asset::{
    load_model,
    mesh::obj::ObjMeta,
    AssetPaths, FsSource, LoadContext, LoadError, ResourceManager,
};
use wf_format::{Model, DEFAULT_MATERIAL_NAME};

fn data_paths() -> AssetPaths {
    let root = env!("CARGO_MANIFEST_DIR");
    AssetPaths {
        models_dir: Path::new(root).join("tests/data"),
        textures_dir: Path::new(root).join("tests/data"),
    }
}

fn load(model: &str, meta: ObjMeta) -> Result<Model, LoadError> {
    let paths = data_paths();
    let ctx = LoadContext {
        source: &FsSource,
        paths: &paths,
    };
    block_on(load_model(&ctx, Path::new(model), &meta))
}

#[test]
pub fn test_cube_with_materials() -> Result<(), LoadError> {
    let model = load("cube.obj", ObjMeta::default())?;

    assert_eq!(model.meshes.len(), 2);
    assert_eq!(model.triangle_count(), 12);
    assert!(model.validate().is_ok());

    let brick = &model.meshes[0];
    assert_eq!(brick.material_name.as_deref(), Some("brick"));
    assert_eq!(brick.indices, (0..18).collect::<Vec<u32>>());
    assert_eq!(brick.texcoords.len(), 18);
    // normal mapped material
    assert_eq!(brick.tangents.len(), 18);
    assert!(brick.tangents.iter().all(|t| t != &[0.0, 0.0, 0.0]));

    let plain = &model.meshes[1];
    assert_eq!(plain.material_name.as_deref(), Some("plain"));
    assert_eq!(plain.indices[0], 0);
    assert!(!plain.has_tangents());

    let material = &model.materials["plain"];
    assert_eq!(material.ambient_color, [1.0, 1.0, 1.0]);
    assert_eq!(material.diffuse_color, [0.2, 0.4, 0.6]);
    assert_eq!(material.alpha, 0.5);
    assert!(material.is_transparent());
    assert_eq!(model.materials["brick"].specular_exponent, 96.0);
    Ok(())
}

#[test]
pub fn test_cube_without_materials() -> Result<(), LoadError> {
    let model = load("plain_cube.obj", ObjMeta::default())?;

    assert_eq!(model.meshes.len(), 1);
    assert_eq!(model.meshes[0].indices.len(), 36);
    assert_eq!(model.meshes[0].material_name.as_deref(), Some(DEFAULT_MATERIAL_NAME));

    let default = &model.materials[DEFAULT_MATERIAL_NAME];
    assert_eq!(default.ambient_color, [1.0, 1.0, 1.0]);
    assert_eq!(default.diffuse_color, [1.0, 1.0, 1.0]);
    assert_eq!(default.alpha, 1.0);
    Ok(())
}

#[test]
pub fn test_serialized_cube() -> Result<(), Box<dyn std::error::Error>> {
    let model = load(
        "plain_cube.obj",
        ObjMeta {
            calculate_tangents: true,
            ..ObjMeta::default()
        },
    )?;

    let restored = Model::from_bytes(model.to_bytes()?)?;
    assert_eq!(restored, model);
    assert_eq!(restored.meshes[0].tangents.len(), 36);
    Ok(())
}

#[test]
pub fn test_resource_batch() {
    let mut manager = ResourceManager::new(FsSource, data_paths());
    let calls = Rc::new(Cell::new(0));
    let inner = calls.clone();
    manager.on_load(move || inner.set(inner.get() + 1));

    block_on(manager.load_resources(
        &["brick.JPG", "brick_norm.JPG"],
        &["cube.obj", "plain_cube.obj", "missing.obj"],
    ));

    assert_eq!(calls.get(), 1);
    assert!(manager.is_loaded());
    assert!(manager.get_texture("brick.JPG").is_some());
    assert!(manager.get_texture("brick_norm.JPG").is_none());
    assert_eq!(manager.get_model("cube.obj").map(|m| m.meshes.len()), Some(2));
    assert!(manager.get_model("plain_cube.obj").is_some());
    assert!(manager.get_model("missing.obj").is_none());
}
