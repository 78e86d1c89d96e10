/// Fixed-length numeric vector summarizing the identity features of a face.
#[derive(Clone, Debug, PartialEq)]
pub struct Encoding(Vec<f32>);

impl Encoding {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Euclidean distance to `other`.
    ///
    /// Encodings of different length describe incompatible models and are
    /// infinitely far apart.
    pub fn distance(&self, other: &Encoding) -> f64 {
        if self.len() != other.len() {
            return f64::INFINITY;
        }
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| {
                let d = *a as f64 - *b as f64;
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }
}

impl From<Vec<f32>> for Encoding {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}
