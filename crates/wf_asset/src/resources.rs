//! Asynchronous fetching of model, material and texture bytes.
//!
//! Everything here runs on the caller's task: futures are `!Send` and a batch is driven to
//! completion by polling it, there is no cancellation and no timeout.

use std::{
    collections::{HashMap, HashSet},
    fs, io,
    path::{Path, PathBuf},
};

use futures::{
    future::LocalBoxFuture,
    stream::{FuturesUnordered, StreamExt},
    FutureExt,
};
use log::{debug, error, info, warn};
use wf_format::Model;

use crate::{
    config::AssetPaths,
    loader::{self, LoadContext, LoadError},
    mesh::obj::ObjMeta,
};

#[derive(thiserror::Error, Debug)]
pub enum TransferError {
    #[error("Resource not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read resource {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TransferError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => TransferError::NotFound(path.to_owned()),
            _ => TransferError::Io {
                path: path.to_owned(),
                source,
            },
        }
    }
}

/// Where resource bytes come from.
pub trait ResourceSource {
    fn fetch<'a>(&'a self, path: &'a Path) -> LocalBoxFuture<'a, Result<Vec<u8>, TransferError>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FsSource;

impl ResourceSource for FsSource {
    fn fetch<'a>(&'a self, path: &'a Path) -> LocalBoxFuture<'a, Result<Vec<u8>, TransferError>> {
        async move {
            debug!("Reading `{}`", path.display());
            fs::read(path).map_err(|err| TransferError::from_io(path, err))
        }
        .boxed_local()
    }
}

/// Serves resources from memory, keyed by their resolved path.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), data.into());
    }

    pub fn with(mut self, path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(path, data);
        self
    }
}

impl ResourceSource for MemorySource {
    fn fetch<'a>(&'a self, path: &'a Path) -> LocalBoxFuture<'a, Result<Vec<u8>, TransferError>> {
        let result = self
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| TransferError::NotFound(path.to_owned()));
        futures::future::ready(result).boxed_local()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub usize);

/// Counts completion signals of a batch and fires its callback once, on the last one.
///
/// Successes and failures both count. Every resource may signal only once, repeated
/// signals and unknown ids are ignored.
pub struct CompletionCounter {
    expected: usize,
    signaled: HashSet<ResourceId>,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl CompletionCounter {
    /// An empty batch is complete right away and fires immediately.
    pub fn new(expected: usize, on_complete: Option<Box<dyn FnOnce()>>) -> Self {
        let mut counter = Self {
            expected,
            signaled: HashSet::with_capacity(expected),
            on_complete,
        };
        counter.fire_if_complete();
        counter
    }

    pub fn signal(&mut self, id: ResourceId) -> bool {
        if id.0 >= self.expected {
            warn!("Ignoring completion of unknown resource {:?}", id);
            return false;
        }
        if !self.signaled.insert(id) {
            warn!("Resource {:?} already signaled completion", id);
            return false;
        }

        self.fire_if_complete();
        true
    }

    pub fn completed(&self) -> usize {
        self.signaled.len()
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn is_complete(&self) -> bool {
        self.signaled.len() == self.expected
    }

    fn fire_if_complete(&mut self) {
        if self.is_complete() {
            if let Some(on_complete) = self.on_complete.take() {
                on_complete();
            }
        }
    }
}

impl std::fmt::Debug for CompletionCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionCounter")
            .field("expected", &self.expected)
            .field("completed", &self.signaled.len())
            .finish()
    }
}

/// Raw texture bytes, decoding is up to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub path: PathBuf,
    pub data: Vec<u8>,
}

enum Loaded {
    Texture {
        name: String,
        path: PathBuf,
        result: Result<Vec<u8>, TransferError>,
    },
    Model {
        name: String,
        result: Result<Model, LoadError>,
    },
}

/// Loads a batch of textures and models and keeps whatever arrived.
pub struct ResourceManager<S> {
    source: S,
    paths: AssetPaths,
    meta: ObjMeta,
    textures: HashMap<String, Texture>,
    models: HashMap<String, Model>,
    on_load: Option<Box<dyn FnOnce()>>,
    is_loaded: bool,
}

impl<S: ResourceSource> ResourceManager<S> {
    pub fn new(source: S, paths: AssetPaths) -> Self {
        Self {
            source,
            paths,
            meta: ObjMeta::default(),
            textures: HashMap::new(),
            models: HashMap::new(),
            on_load: None,
            is_loaded: false,
        }
    }

    /// Import options for models of the batch that have neither a `<stem>.toml` nor an
    /// `obj.toml` next to them.
    pub fn with_meta(mut self, meta: ObjMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Called once, after every resource of the next batch reported back.
    pub fn on_load(&mut self, callback: impl FnOnce() + 'static) {
        self.on_load = Some(Box::new(callback));
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    pub fn get_texture(&self, name: &str) -> Option<&Texture> {
        self.textures.get(name)
    }

    pub fn get_model(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    pub fn take_model(&mut self, name: &str) -> Option<Model> {
        self.models.remove(name)
    }

    /// Fetches every texture and model concurrently.
    ///
    /// A resource that fails to load is logged and leaves its slot empty, it still counts
    /// towards completion. Once a batch completed, further calls do nothing.
    pub async fn load_resources(&mut self, textures: &[&str], models: &[&str]) {
        if self.is_loaded {
            debug!("Resources are already loaded");
            return;
        }

        let mut counter = CompletionCounter::new(textures.len() + models.len(), self.on_load.take());
        info!(
            "Loading {} textures and {} models",
            textures.len(),
            models.len()
        );

        let ctx = LoadContext {
            source: &self.source,
            paths: &self.paths,
        };
        let meta = self.meta;
        let mut pending: FuturesUnordered<LocalBoxFuture<'_, (ResourceId, Loaded)>> =
            FuturesUnordered::new();

        for (i, texture) in textures.iter().enumerate() {
            let name = texture.to_string();
            let path = self.paths.texture_path(texture);
            pending.push(
                async move {
                    let result = ctx.source.fetch(&path).await;
                    (ResourceId(i), Loaded::Texture { name, path, result })
                }
                .boxed_local(),
            );
        }

        for (i, model) in models.iter().enumerate() {
            let name = model.to_string();
            let id = ResourceId(textures.len() + i);
            pending.push(
                async move {
                    let result = load_batch_model(&ctx, Path::new(&name), meta).await;
                    (id, Loaded::Model { name, result })
                }
                .boxed_local(),
            );
        }

        while let Some((id, loaded)) = pending.next().await {
            match loaded {
                Loaded::Texture {
                    name,
                    path,
                    result: Ok(data),
                } => {
                    self.textures.insert(name, Texture { path, data });
                }
                Loaded::Texture {
                    name,
                    result: Err(err),
                    ..
                } => error!("Failed to load texture `{}`: {}", name, err),
                Loaded::Model {
                    name,
                    result: Ok(model),
                } => {
                    self.models.insert(name, model);
                }
                Loaded::Model {
                    name,
                    result: Err(err),
                } => error!("Failed to load model `{}`: {}", name, err),
            }

            counter.signal(id);
        }

        self.is_loaded = counter.is_complete();
    }
}

async fn load_batch_model(
    ctx: &LoadContext<'_>,
    model: &Path,
    fallback: ObjMeta,
) -> Result<Model, LoadError> {
    let meta = loader::load_meta(ctx, model).await?.unwrap_or(fallback);
    loader::load_model(ctx, model, &meta).await
}
