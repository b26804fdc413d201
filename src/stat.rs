use std::collections::HashMap;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Result, Write};
use std::path::Path;
use std::time::Duration;

/// Summary of timings in microseconds.
#[derive(Debug, Clone)]
pub struct Stat {
  pub count: usize,
  pub mean: f64,
  pub median: f64,
  pub std_dev: f64,
  pub min: f64,
  pub max: f64,
}

impl Stat {
  pub fn from_vec(mut data: Vec<f64>) -> Stat {
    if data.is_empty() {
      return Stat { count: 0, mean: f64::NAN, median: f64::NAN, std_dev: f64::NAN, min: f64::NAN, max: f64::NAN };
    }
    data.sort_by(|a, b| a.total_cmp(b));
    let count = data.len();
    let min = data[0];
    let max = data[count - 1];
    let mean = data.iter().sum::<f64>() / count as f64;
    let median = if count % 2 == 0 {
      let mid = count / 2;
      (data[mid - 1] + data[mid]) / 2.0
    } else {
      data[count / 2]
    };
    let variance = data
      .iter()
      .map(|&x| {
        let diff = x - mean;
        diff * diff
      })
      .sum::<f64>()
      / count as f64;
    let std_dev = variance.sqrt();
    Stat { count, mean, median, std_dev, min, max }
  }
}

impl Display for Stat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    // 2σ (equivalent to 95.4% confidence interval) calculated as a percentage
    let two_sigma_percent = if self.mean > 0.0 { (2.0 * self.std_dev / self.mean) * 100.0 } else { 0.0 };
    f.write_fmt(format_args!(
      "{}: {:.2}µs ±{:.1}% [{:.1}|{:.1}|{:.1}]",
      self.count, self.mean, two_sigma_percent, self.min, self.median, self.max
    ))
  }
}

/// Timings grouped by the measured tree size.
pub struct Report<X: Display + Copy + std::hash::Hash + Eq + Ord> {
  data_set: HashMap<X, Vec<f64>>,
}

impl<X: Display + Copy + std::hash::Hash + Eq + Ord> Report<X> {
  pub fn new() -> Self {
    Report { data_set: HashMap::new() }
  }

  pub fn add(&mut self, x: X, y: Duration) {
    self.data_set.entry(x).or_default().push(y.as_nanos() as f64 / 1000.0);
  }

  pub fn single(&self, x: X) -> Option<Stat> {
    self.data_set.get(&x).map(|ys| Stat::from_vec(ys.clone()))
  }

  pub fn save_to_csv(&self, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "N,COUNT,MEAN,MEDIAN,STDDEV,MIN,MAX")?;

    let mut xs = self.data_set.keys().copied().collect::<Vec<_>>();
    xs.sort_unstable();
    for x in xs.iter() {
      if let Some(y) = self.single(*x) {
        writeln!(
          writer,
          "\"{}\",{},{:.3},{:.3},{:.3},{:.3},{:.3}",
          x, y.count, y.mean, y.median, y.std_dev, y.min, y.max
        )?;
      }
    }

    writer.flush()?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stat_of_odd_and_even_samples() {
    let s = Stat::from_vec(vec![3.0, 1.0, 2.0]);
    assert_eq!(3, s.count);
    assert_eq!(2.0, s.median);
    assert_eq!(2.0, s.mean);
    assert_eq!((1.0, 3.0), (s.min, s.max));

    let s = Stat::from_vec(vec![4.0, 1.0, 2.0, 3.0]);
    assert_eq!(2.5, s.median);
    assert!(Stat::from_vec(vec![]).mean.is_nan());
  }

  #[test]
  fn report_csv() {
    let mut report = Report::new();
    report.add(8u64, Duration::from_micros(5));
    report.add(8u64, Duration::from_micros(7));
    report.add(2u64, Duration::from_micros(1));
    assert_eq!(6.0, report.single(8).unwrap().mean);
    assert!(report.single(4).is_none());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    report.save_to_csv(&path).unwrap();
    let csv = std::fs::read_to_string(&path).unwrap();
    let lines = csv.lines().collect::<Vec<_>>();
    assert_eq!("N,COUNT,MEAN,MEDIAN,STDDEV,MIN,MAX", lines[0]);
    assert_eq!("\"2\",1,1.000,1.000,0.000,1.000,1.000", lines[1]);
    assert_eq!("\"8\",2,6.000,6.000,1.000,5.000,7.000", lines[2]);
  }
}
