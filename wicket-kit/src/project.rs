use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use dashu::integer::IBig;
use tracing::debug;
use wicket::{ConeOptions, ConeOutput, Precision, Problem, enumerate};
use wicket_core::{Int, text};

/// Files sharing one project stem: `STEM.mat`, `STEM.sign`, `STEM.rel` in, `STEM.qhom`,
/// `STEM.cir`, `STEM.qfree` out.
#[derive(Clone, Debug)]
pub(crate) struct Project {
    stem: PathBuf,
}

impl Project {
    /// A trailing `.mat` is accepted and stripped.
    pub(crate) fn new(path: &Path) -> Self {
        let stem = if path.extension().is_some_and(|ext| ext == "mat") {
            path.with_extension("")
        } else {
            path.to_path_buf()
        };
        Self { stem }
    }

    fn file(&self, ext: &str) -> PathBuf {
        let mut name = OsString::from(self.stem.as_os_str());
        name.push(".");
        name.push(ext);
        PathBuf::from(name)
    }

    fn read_optional(&self, ext: &str) -> Result<Option<String>> {
        let path = self.file(ext);
        if !path.is_file() {
            return Ok(None);
        }
        let body = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        Ok(Some(body))
    }

    pub(crate) fn load<T: Int>(&self) -> Result<Problem<T>> {
        let mat = self.file("mat");
        ensure!(mat.is_file(), "matrix file {} not found", mat.display());
        let body = fs::read_to_string(&mat).with_context(|| format!("reading {}", mat.display()))?;
        let matrix = text::parse_matrix::<T>(&body).with_context(|| format!("parsing {}", mat.display()))?;
        debug!(
            rows = matrix.row_count(),
            cols = matrix.col_count(),
            precision = T::NAME,
            "loaded matrix"
        );

        let mut problem = Problem::new(matrix);
        if let Some(body) = self.read_optional("sign")? {
            let signs = text::parse_signs(&body).context("parsing the sign file")?;
            problem = problem.with_signs(signs).context("applying the sign file")?;
        }
        if let Some(body) = self.read_optional("rel")? {
            let relations = text::parse_relations(&body).context("parsing the relation file")?;
            problem = problem.with_relations(relations).context("applying the relation file")?;
        }
        Ok(problem)
    }

    /// Runs the enumeration at the configured precision and returns the files written.
    pub(crate) fn solve(&self, options: &ConeOptions) -> Result<Vec<PathBuf>> {
        match options.precision() {
            Precision::Bits32 => self.solve_with::<i32>(options),
            Precision::Bits64 => self.solve_with::<i64>(options),
            Precision::Arbitrary => self.solve_with::<IBig>(options),
        }
    }

    fn solve_with<T: Int>(&self, options: &ConeOptions) -> Result<Vec<PathBuf>> {
        let problem = self.load::<T>()?;
        let out = enumerate(&problem, options)?;
        self.write(&out, problem.var_count())
    }

    fn write<T: Int>(&self, out: &ConeOutput<T>, cols: usize) -> Result<Vec<PathBuf>> {
        let outputs = [
            ("qhom", out.homogeneous()),
            ("cir", out.circuit_classes()?),
            ("qfree", out.subspace().to_vec()),
        ];
        let mut written = Vec::with_capacity(outputs.len());
        for (ext, rows) in outputs {
            let path = self.file(ext);
            fs::write(&path, text::write_matrix(&rows, cols))
                .with_context(|| format!("writing {}", path.display()))?;
            written.push(path);
        }
        Ok(written)
    }
}
