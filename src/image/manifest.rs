use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DOCKER_MANIFEST_V2: &str = "application/vnd.docker.distribution.manifest.v2+json";

/// Docker image manifest, schema version 2
///
/// A manifest decoded with [`Manifest::from_slice`] remembers the exact bytes it
/// came from, so publishing it unchanged keeps the registry digest stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub schema_version: u32,
    #[serde(default)]
    pub media_type: String,
    pub config: Descriptor,
    #[serde(default)]
    pub layers: Vec<Descriptor>,
    /// Fields outside the schema 2 core, re-emitted untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    raw: Option<Vec<u8>>,
}

// Equality is over the decoded model; the remembered bytes are not compared.
impl PartialEq for Manifest {
    fn eq(&self, other: &Self) -> bool {
        self.schema_version == other.schema_version
            && self.media_type == other.media_type
            && self.config == other.config
            && self.layers == other.layers
            && self.extra == other.extra
    }
}

/// Content-addressed pointer to a blob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    pub media_type: String,
    pub digest: String,
    pub size: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Manifest {
    pub fn new(media_type: impl Into<String>, config: Descriptor, layers: Vec<Descriptor>) -> Self {
        Self {
            schema_version: 2,
            media_type: media_type.into(),
            config,
            layers,
            extra: Map::new(),
            raw: None,
        }
    }

    pub fn from_slice(data: &[u8]) -> serde_json::Result<Self> {
        let mut manifest: Manifest = serde_json::from_slice(data)?;
        manifest.raw = Some(data.to_vec());
        Ok(manifest)
    }

    /// Body for publishing: the fetched bytes when the model still matches them,
    /// otherwise a fresh encoding
    pub fn to_vec(&self) -> serde_json::Result<Vec<u8>> {
        let unchanged = self.raw.as_ref().filter(|raw| {
            serde_json::from_slice::<Manifest>(raw).is_ok_and(|fetched| fetched == *self)
        });
        match unchanged {
            Some(raw) => Ok(raw.clone()),
            None => serde_json::to_vec(self),
        }
    }

    /// Content-Type for publishing this manifest
    pub fn content_type(&self) -> &str {
        if self.media_type.is_empty() {
            DOCKER_MANIFEST_V2
        } else {
            &self.media_type
        }
    }
}
