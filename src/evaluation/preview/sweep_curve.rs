use crate::error::KnnError;
use crate::evaluation::preview::sweep_point::SweepPoint;
use crate::evaluation::sweep::best_k;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveFormat {
    Csv,
    Tsv,
    Json,
}

/// Sweep results in the order the k values were given.
#[derive(Clone, Debug, Default)]
pub struct SweepCurve {
    points: Vec<SweepPoint>,
}

impl SweepCurve {
    pub fn push(&mut self, point: SweepPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&SweepPoint> {
        self.points.last()
    }

    pub fn points(&self) -> &[SweepPoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &SweepPoint> {
        self.points.iter()
    }

    pub fn best_k(&self) -> Result<usize, KnnError> {
        best_k(&self.points)
    }

    pub fn point_for(&self, k: usize) -> Option<&SweepPoint> {
        self.points.iter().find(|p| p.k == k)
    }

    pub fn export(&self, path: &Path, format: CurveFormat) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_to(&mut out, format)?;
        out.flush()
    }

    pub fn write_to<W: Write>(&self, out: &mut W, format: CurveFormat) -> io::Result<()> {
        match format {
            CurveFormat::Csv => self.write_delimited(out, ','),
            CurveFormat::Tsv => self.write_delimited(out, '\t'),
            CurveFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, &self.points)?;
                writeln!(out)
            }
        }
    }

    fn write_delimited<W: Write>(&self, out: &mut W, sep: char) -> io::Result<()> {
        writeln!(
            out,
            "k{sep}training_accuracy{sep}testing_accuracy{sep}seconds"
        )?;
        for p in &self.points {
            writeln!(
                out,
                "{}{sep}{}{sep}{}{sep}{}",
                p.k, p.training_accuracy, p.testing_accuracy, p.seconds
            )?;
        }
        Ok(())
    }
}

impl FromIterator<SweepPoint> for SweepCurve {
    fn from_iter<I: IntoIterator<Item = SweepPoint>>(iter: I) -> Self {
        SweepCurve {
            points: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::fs;
    use tempfile::tempdir;

    fn curve() -> SweepCurve {
        [(1, 1.0, 0.5), (3, 0.75, 0.625)]
            .into_iter()
            .map(|(k, tr, te)| SweepPoint {
                k,
                training_accuracy: tr,
                testing_accuracy: te,
                seconds: 0.0,
            })
            .collect()
    }

    #[test]
    fn csv_and_tsv_have_header_and_rows() {
        let mut buf = Vec::new();
        curve().write_to(&mut buf, CurveFormat::Csv).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "k,training_accuracy,testing_accuracy,seconds");
        assert_eq!(lines[1], "1,1,0.5,0");
        assert_eq!(lines[2], "3,0.75,0.625,0");

        let mut buf = Vec::new();
        curve().write_to(&mut buf, CurveFormat::Tsv).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("k\ttraining_accuracy\t"));
    }

    #[test]
    fn json_is_an_array_of_points() {
        let mut buf = Vec::new();
        curve().write_to(&mut buf, CurveFormat::Json).unwrap();
        let v: Value = serde_json::from_slice(&buf).unwrap();
        let arr = v.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[1]["k"].as_u64(), Some(3));
        assert_eq!(arr[1]["testing_accuracy"].as_f64(), Some(0.625));
    }

    #[test]
    fn export_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("curve.csv");
        curve().export(&path, CurveFormat::Csv).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn lookups() {
        let c = curve();
        assert_eq!(c.len(), 2);
        assert_eq!(c.latest().unwrap().k, 3);
        assert_eq!(c.point_for(1).unwrap().testing_accuracy, 0.5);
        assert!(c.point_for(2).is_none());
        assert_eq!(c.best_k().unwrap(), 3);
    }
}
