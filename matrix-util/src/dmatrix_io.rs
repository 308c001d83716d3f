use crate::common_io::{mkdir_parent, read_lines_of_types, write_lines, Delimiter};
use crate::traits::*;
use log::debug;
pub use nalgebra::{DMatrix, DVector};

impl IoOps for DMatrix<f64> {
    type Scalar = f64;
    type Mat = Self;

    fn read_file_delim(
        tsv_file: &str,
        delim: impl Into<Delimiter>,
        skip: Option<usize>,
    ) -> anyhow::Result<Self::Mat> {
        let data = read_lines_of_types::<f64>(tsv_file, delim, skip)?.lines;

        if data.is_empty() {
            return Err(anyhow::anyhow!("No data in file"));
        }

        let ncols = data[0].len();
        let nrows = data.len();

        if let Some((i, _)) = data.iter().enumerate().find(|(_, x)| x.len() != ncols) {
            return Err(anyhow::anyhow!(
                "ragged row {} in {}: expected {} columns",
                i + 1,
                tsv_file,
                ncols
            ));
        }

        let data = data.into_iter().flatten().collect::<Vec<_>>();
        debug!("read {} x {} from {}", nrows, ncols, tsv_file);

        Ok(DMatrix::<f64>::from_row_iterator(nrows, ncols, data))
    }

    fn write_file_delim(&self, tsv_file: &str, delim: &str) -> anyhow::Result<()> {
        mkdir_parent(tsv_file)?;

        let lines = self
            .row_iter()
            .map(|row| {
                row.iter()
                    .map(|x| format!("{}", *x))
                    .collect::<Vec<String>>()
                    .join(delim)
                    .into_boxed_str()
            })
            .collect::<Vec<_>>();

        write_lines(&lines, tsv_file)?;
        Ok(())
    }
}
