//! Small output and construction helpers shared by the binaries.

/// Construct a [`Complex64`][num_complex::Complex64].
///
/// ```
/// # use heralded_transducer::c;
/// let a = c!(1.0);
/// let b = c!(i 2.0);
/// let z = c!(1.0, 2.0);
/// assert_eq!(a + b, z);
/// ```
#[macro_export]
macro_rules! c {
    ( i $im:expr ) => {
        num_complex::Complex64::new(0.0, $im)
    };
    ( $re:expr, $im:expr ) => {
        num_complex::Complex64::new($re, $im)
    };
    ( $re:expr ) => {
        num_complex::Complex64::new($re, 0.0)
    };
}

/// Create a directory (and all of its parents) if it doesn't already exist.
///
/// Expands to an expression using `?`, so the enclosing function must return a
/// `Result` whose error type can be built from a [`std::io::Error`].
#[macro_export]
macro_rules! mkdir {
    ( $dir:expr ) => {
        {
            let dir: &std::path::Path = $dir.as_ref();
            if !dir.is_dir() {
                tracing::info!("mkdir -p {}", dir.display());
                std::fs::create_dir_all(dir)?;
            }
        }
    }
}

/// Write a collection of arrays to a single `.npz` file.
///
/// ```ignore
/// write_npz!(
///     outdir.join("data.npz"),
///     arrays: {
///         "time" => &time,
///         "psi" => &psi,
///     }
/// );
/// ```
///
/// Expands to an expression using `?`; the enclosing function's error type
/// must be buildable from [`std::io::Error`] and
/// [`ndarray_npy::WriteNpzError`].
#[macro_export]
macro_rules! write_npz {
    (
        $filename:expr,
        arrays: { $( $key:literal => $val:expr ),* $(,)? }
    ) => {
        {
            let filename: std::path::PathBuf = $filename.into();
            let mut output = ndarray_npy::NpzWriter::new(
                std::fs::File::create(&filename)?
            );
            $(
                output.add_array($key, $val)?;
            )*
            output.finish()?;
            tracing::info!("wrote {}", filename.display());
        }
    }
}

/// Generate `n` logarithmically spaced points between `10^start` and
/// `10^stop`, inclusive.
pub fn logspace(start: f64, stop: f64, n: usize) -> ndarray::Array1<f64> {
    ndarray::Array1::linspace(start, stop, n).mapv(|x| 10.0_f64.powf(x))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Result;

    #[test]
    fn complex_macro() {
        assert_eq!(c!(i 2.0), num_complex::Complex64::new(0.0, 2.0));
        assert_eq!(c!(3.0), num_complex::Complex64::new(3.0, 0.0));
        assert_eq!(c!(3.0, -1.0), num_complex::Complex64::new(3.0, -1.0));
    }

    #[test]
    fn logspace_endpoints() {
        let x = logspace(2.0, 6.0, 5);
        assert_eq!(x.len(), 5);
        assert!((x[0] - 1e2).abs() < 1e-9);
        assert!((x[2] - 1e4).abs() < 1e-6);
        assert!((x[4] - 1e6).abs() < 1e-3);
    }

    #[test]
    fn npz_roundtrip_to_disk() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let outdir = dir.path().join("nested/output");
        mkdir!(outdir);
        let x = ndarray::array![1.0_f64, 2.0, 3.0];
        write_npz!(
            outdir.join("x.npz"),
            arrays: { "x" => &x }
        );
        assert!(outdir.join("x.npz").is_file());
        Ok(())
    }
}
