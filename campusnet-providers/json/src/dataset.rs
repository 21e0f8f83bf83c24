//! Loading of a campus data directory.

use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use campusnet_core::{
    CategoryRecord, CategorySet, Edge, EdgeRecord, Graph, RecordKind, UserRecord,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use crate::{
    errors::JsonProviderError,
    records::{RawCategory, RawLink, RawUser},
};

const USERS: [&str; 2] = ["users.json", "usuarios.json"];
const FRIENDSHIPS: [&str; 2] = ["friendships.json", "amistades.json"];
const CATEGORIES: [&str; 2] = ["categories.json", "categorias.json"];
const CANDIDATES: [&str; 1] = ["candidates.json"];

/// In-memory JSON documents making up a data set.
///
/// Useful when the documents do not live on disk, for example in tests or
/// when they arrive over another channel.
#[derive(Clone, Copy, Debug, Default)]
pub struct DataDocuments<'a> {
    /// Contents of `users.json`.
    pub users: &'a str,
    /// Contents of `friendships.json`.
    pub friendships: &'a str,
    /// Contents of `categories.json`, if any.
    pub categories: Option<&'a str>,
    /// Contents of `candidates.json`, if any.
    pub candidates: Option<&'a str>,
}

/// Validated campus data loaded from JSON.
///
/// # Examples
/// ```
/// use campusnet_providers_json::{CampusDataset, DataDocuments};
///
/// let dataset = CampusDataset::try_from_documents(DataDocuments {
///     users: r#"[{"id": 1, "nombre": "Ana", "apellido": "Paz"}, {"id": 2, "name": "Bo"}]"#,
///     friendships: r#"[{"u": 1, "v": 2, "costo": 4}]"#,
///     ..DataDocuments::default()
/// })?;
/// assert_eq!(dataset.graph().user_count(), 2);
/// assert_eq!(dataset.graph().users()[0].name(), "Ana Paz");
/// assert!(dataset.categories().is_empty());
/// # Ok::<(), campusnet_providers_json::JsonProviderError>(())
/// ```
#[derive(Clone, Debug)]
pub struct CampusDataset {
    graph: Graph,
    categories: CategorySet,
    candidates: Vec<Edge>,
}

impl CampusDataset {
    /// Loads and validates every document found in `dir`.
    ///
    /// # Errors
    /// Returns [`JsonProviderError::MissingDocument`] when the user or
    /// friendship document is absent, [`JsonProviderError::Io`] or
    /// [`JsonProviderError::Parse`] when a document cannot be read, and
    /// [`JsonProviderError::Validation`] when records are rejected.
    #[instrument(
        name = "providers.json.load",
        err,
        skip_all,
        fields(dir = %dir.as_ref().display()),
    )]
    pub fn try_from_dir(dir: impl AsRef<Path>) -> Result<Self, JsonProviderError> {
        let dir = dir.as_ref();
        let users: Vec<RawUser> = read_document(&require(dir, &USERS)?)?;
        let links: Vec<RawLink> = read_document(&require(dir, &FRIENDSHIPS)?)?;
        let categories: Vec<RawCategory> = match locate(dir, &CATEGORIES) {
            Some(path) => read_document(&path)?,
            None => Vec::new(),
        };
        let candidates: Vec<RawLink> = match locate(dir, &CANDIDATES) {
            Some(path) => read_document(&path)?,
            None => Vec::new(),
        };
        let dataset = Self::assemble(users, links, categories, &candidates)?;
        info!(
            users = dataset.graph.user_count(),
            edges = dataset.graph.edge_count(),
            categories = dataset.categories.len(),
            candidates = dataset.candidates.len(),
            "data directory loaded"
        );
        Ok(dataset)
    }

    /// Parses and validates in-memory documents.
    ///
    /// # Errors
    /// Returns [`JsonProviderError::Parse`] for malformed documents and
    /// [`JsonProviderError::Validation`] when records are rejected.
    pub fn try_from_documents(documents: DataDocuments<'_>) -> Result<Self, JsonProviderError> {
        let users: Vec<RawUser> = parse_document(USERS[0], documents.users)?;
        let links: Vec<RawLink> = parse_document(FRIENDSHIPS[0], documents.friendships)?;
        let categories: Vec<RawCategory> = documents
            .categories
            .map(|text| parse_document(CATEGORIES[0], text))
            .transpose()?
            .unwrap_or_default();
        let candidates: Vec<RawLink> = documents
            .candidates
            .map(|text| parse_document(CANDIDATES[0], text))
            .transpose()?
            .unwrap_or_default();
        Self::assemble(users, links, categories, &candidates)
    }

    fn assemble(
        users: Vec<RawUser>,
        links: Vec<RawLink>,
        categories: Vec<RawCategory>,
        candidates: &[RawLink],
    ) -> Result<Self, JsonProviderError> {
        let user_records: Vec<UserRecord> = users.iter().map(RawUser::to_record).collect();
        let edge_records: Vec<EdgeRecord> = links.into_iter().map(EdgeRecord::from).collect();
        let graph = Graph::try_new(user_records, &edge_records)?;

        let mut derived = 0_usize;
        let mut unreached = 0_usize;
        let mut category_records: Vec<CategoryRecord> = Vec::with_capacity(categories.len());
        for category in categories {
            let id = category.id;
            if category.reached_user_ids.is_none() {
                derived += 1;
            }
            match category.into_record(&users) {
                Some(record) => category_records.push(record),
                None => {
                    unreached += 1;
                    debug!(category = id, "no user lists category; dropped");
                }
            }
        }
        let categories = CategorySet::try_new(category_records, &graph)?;
        let candidates = validate_candidates(&graph, candidates)?;
        debug!(
            categories = categories.len(),
            derived_reach = derived,
            unreached,
            candidates = candidates.len(),
            "documents assembled"
        );
        Ok(Self {
            graph,
            categories,
            candidates,
        })
    }

    /// Reads a candidate pool from `path` and validates it against this
    /// data set's users.
    ///
    /// # Errors
    /// Returns [`JsonProviderError::Io`], [`JsonProviderError::Parse`] or
    /// [`JsonProviderError::Validation`].
    #[instrument(
        name = "providers.json.candidates",
        err,
        skip_all,
        fields(path = %path.as_ref().display()),
    )]
    pub fn read_candidates(&self, path: impl AsRef<Path>) -> Result<Vec<Edge>, JsonProviderError> {
        let links: Vec<RawLink> = read_document(path.as_ref())?;
        validate_candidates(&self.graph, &links)
    }

    /// Returns the validated graph.
    #[must_use]
    #[rustfmt::skip]
    pub const fn graph(&self) -> &Graph { &self.graph }

    /// Returns the validated categories; empty without `categories.json`.
    #[must_use]
    #[rustfmt::skip]
    pub const fn categories(&self) -> &CategorySet { &self.categories }

    /// Returns the validated candidate pool; empty without `candidates.json`.
    #[must_use]
    #[rustfmt::skip]
    pub fn candidates(&self) -> &[Edge] { &self.candidates }
}

fn validate_candidates(graph: &Graph, links: &[RawLink]) -> Result<Vec<Edge>, JsonProviderError> {
    let records: Vec<EdgeRecord> = links.iter().copied().map(EdgeRecord::from).collect();
    Ok(graph.validate_links(&records, RecordKind::Candidate)?)
}

fn locate(dir: &Path, names: &[&'static str]) -> Option<PathBuf> {
    names
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

fn require(dir: &Path, names: &[&'static str]) -> Result<PathBuf, JsonProviderError> {
    locate(dir, names).ok_or_else(|| JsonProviderError::MissingDocument {
        dir: dir.to_path_buf(),
        name: names.first().copied().unwrap_or_default(),
    })
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, JsonProviderError> {
    let file = File::open(path).map_err(|source| io_error(path, source))?;
    let parsed = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        if source.is_io() {
            JsonProviderError::Io {
                path: path.to_path_buf(),
                source: io::Error::from(source),
            }
        } else {
            JsonProviderError::Parse {
                document: path.display().to_string(),
                source,
            }
        }
    })?;
    debug!(path = %path.display(), "document read");
    Ok(parsed)
}

fn io_error(path: &Path, source: io::Error) -> JsonProviderError {
    JsonProviderError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn parse_document<T: DeserializeOwned>(name: &str, text: &str) -> Result<T, JsonProviderError> {
    serde_json::from_str(text).map_err(|source| JsonProviderError::Parse {
        document: name.to_owned(),
        source,
    })
}
