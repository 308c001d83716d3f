use crate::common_io::Delimiter;
use rand::Rng;

/// Operations to sample random matrices with an explicit random
/// source, so that every draw can be reproduced from a seed
pub trait SampleOps {
    type Mat;
    type Scalar;

    /// Sample a matrix from a uniform distribution `U(0,1)`
    fn runif<R: Rng + ?Sized>(dd: usize, nn: usize, rng: &mut R) -> Self::Mat;

    /// Sample a matrix from a normal distribution `N(0,1)`
    fn rnorm<R: Rng + ?Sized>(dd: usize, nn: usize, rng: &mut R) -> Self::Mat;
}

/// Centre or scale rows and columns
pub trait MatOps {
    type Mat;
    type Scalar;

    fn centre_columns_inplace(&mut self);
    fn centre_columns(&self) -> Self::Mat;

    /// Subtract row means and divide by row standard deviations so
    /// that each row (a variable observed over columns) is z-scored
    fn scale_rows_inplace(&mut self);
    fn scale_rows(&self) -> Self::Mat;
}

/// Summary statistics across the columns (samples) of a matrix
pub trait StatOps {
    type Mat;
    type DVec;

    /// Average over columns: `d x n -> d`
    fn row_means(&self) -> Self::DVec;

    /// Maximum-likelihood covariance of the rows,
    /// `(X - mean)(X - mean)ᵗ / n`
    fn row_covariance(&self) -> Self::Mat;
}

/// Read and write matrices from and to files
pub trait IoOps {
    type Scalar;
    type Mat;

    fn read_file_delim(
        file: &str,
        delim: impl Into<Delimiter>,
        skip: Option<usize>,
    ) -> anyhow::Result<Self::Mat>;

    fn from_tsv(tsv_file: &str, skip: Option<usize>) -> anyhow::Result<Self::Mat> {
        Self::read_file_delim(tsv_file, "\t", skip)
    }

    fn write_file_delim(&self, file: &str, delim: &str) -> anyhow::Result<()>;

    fn to_tsv(&self, tsv_file: &str) -> anyhow::Result<()> {
        self.write_file_delim(tsv_file, "\t")
    }
}
