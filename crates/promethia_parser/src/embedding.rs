//! Embedding providers and nearest-neighbor indexes.
//!
//! The classifier treats the embedding model as an opaque function from text
//! to a fixed-length vector ([`Embedder`]) and searches exemplar vectors
//! through a [`VectorIndex`]. [`TrigramEmbedder`] and [`FlatL2Index`] are the
//! built-in implementations.

use promethia_foundation::{Error, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Maps text to a fixed-length vector.
pub trait Embedder: Send + Sync {
    /// Length of every vector this embedder produces.
    fn dim(&self) -> usize;

    /// Computes the embedding of `text`.
    ///
    /// # Errors
    ///
    /// Returns an embedding error if the provider cannot encode the text.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// One search hit: the position of an indexed vector and its distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    /// Insertion position of the vector in the index
    pub id: usize,
    /// Squared L2 distance to the query
    pub distance: f32,
}

/// Nearest-neighbor index over fixed-length vectors.
///
/// Vectors are identified by insertion order. There is no incremental
/// deletion; callers [`clear`](VectorIndex::clear) and re-add.
pub trait VectorIndex: Send + Sync {
    /// Vector length accepted by this index.
    fn dim(&self) -> usize;

    /// Appends a vector, returning its id.
    ///
    /// # Errors
    ///
    /// Returns a dimension error if the vector has the wrong length.
    fn add(&mut self, vector: Vec<f32>) -> Result<usize>;

    /// Returns up to `k` nearest vectors, closest first.
    ///
    /// # Errors
    ///
    /// Returns a dimension error if the query has the wrong length.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>>;

    /// Removes every vector.
    fn clear(&mut self);

    /// Number of indexed vectors.
    fn len(&self) -> usize;

    /// Returns true if nothing is indexed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exhaustive squared-L2 index.
///
/// Every query scans all vectors. Ties are broken by insertion order, so
/// results are a pure function of the index contents.
#[derive(Clone, Debug)]
pub struct FlatL2Index {
    dim: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatL2Index {
    /// Creates an empty index for vectors of length `dim`.
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            vectors: Vec::new(),
        }
    }

    fn check_dim(&self, len: usize) -> Result<()> {
        if len == self.dim {
            Ok(())
        } else {
            Err(Error::embedding_dimension(self.dim, len))
        }
    }
}

impl VectorIndex for FlatL2Index {
    fn dim(&self) -> usize {
        self.dim
    }

    fn add(&mut self, vector: Vec<f32>) -> Result<usize> {
        self.check_dim(vector.len())?;
        self.vectors.push(vector);
        Ok(self.vectors.len() - 1)
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        self.check_dim(query.len())?;

        let mut hits: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(id, vector)| Neighbor {
                id,
                distance: squared_l2(query, vector),
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.id.cmp(&b.id)));
        hits.truncate(k);
        Ok(hits)
    }

    fn clear(&mut self) {
        self.vectors.clear();
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }
}

/// Squared Euclidean distance between two equal-length vectors.
#[must_use]
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

/// Deterministic embedder built from character trigrams.
///
/// Each trigram of a word (padded with `<` and `>`) is assigned a random unit
/// vector drawn from a ChaCha generator seeded by the trigram itself; a
/// text's embedding is the normalized sum over all its trigrams. Words that
/// share most of their spelling ("webpage", "webpages") land close together,
/// unrelated words are nearly orthogonal. Requires no model files.
#[derive(Clone, Debug)]
pub struct TrigramEmbedder {
    dim: usize,
    case_sensitive: bool,
}

impl TrigramEmbedder {
    /// Creates an embedder producing vectors of length `dim`.
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            case_sensitive: false,
        }
    }

    /// Builder method to keep case when embedding.
    #[must_use]
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    fn add_trigram(&self, gram: &[char], acc: &mut [f32]) {
        // Each char gets a fixed 4-byte slot, so distinct trigrams get distinct seeds.
        let mut seed = [0u8; 32];
        let mut buf = [0u8; 4];
        for (slot, c) in gram.iter().enumerate() {
            let encoded = c.encode_utf8(&mut buf);
            let start = slot * 4;
            seed[start..start + encoded.len()].copy_from_slice(encoded.as_bytes());
        }

        let mut rng = ChaCha8Rng::from_seed(seed);
        let mut gram_vector: Vec<f32> = (0..self.dim).map(|_| rng.gen_range(-1.0..1.0)).collect();
        normalize(&mut gram_vector);

        for (a, g) in acc.iter_mut().zip(gram_vector) {
            *a += g;
        }
    }
}

impl Embedder for TrigramEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let text = if self.case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        };

        let mut acc = vec![0.0_f32; self.dim];
        for word in text.split_whitespace() {
            let padded: Vec<char> = std::iter::once('<')
                .chain(word.chars())
                .chain(std::iter::once('>'))
                .collect();
            for gram in padded.windows(3) {
                self.add_trigram(gram, &mut acc);
            }
        }

        normalize(&mut acc);
        Ok(acc)
    }
}
