use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress over the photos of one folder, with a line per photo above the bar.
pub struct Progress {
    bar: ProgressBar,
    added: usize,
    skipped: usize,
}

pub enum Update<'a> {
    Added(&'a str),
    Skipped(&'a str),
}

impl Progress {
    pub fn new(len: u64) -> Self {
        let bar_style = ProgressStyle::with_template("{spinner:.white} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos:>5}/{len:5}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let bar = ProgressBar::new(len);
        bar.set_style(bar_style);

        Progress {
            bar,
            added: 0,
            skipped: 0,
        }
    }

    pub fn update(&mut self, u: Update) {
        match u {
            Update::Added(name) => {
                self.added += 1;
                self.bar.println(format!("\t{} {}", style("[ ADDED  ]").green(), name));
            }
            Update::Skipped(name) => {
                self.skipped += 1;
                self.bar.println(format!("\t{} {} (no GPS)", style("[SKIPPED ]").yellow(), name));
            }
        }
        self.bar.inc(1);
    }

    /// Clears the bar and returns (added, skipped).
    pub fn finish(&self) -> (usize, usize) {
        self.bar.finish_and_clear();
        (self.added, self.skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts() {
        let mut p = Progress::new(3);

        p.update(Update::Added("a.jpg"));
        p.update(Update::Skipped("b.jpg"));
        p.update(Update::Added("c.jpg"));

        assert_eq!(p.bar.position(), 3);
        assert_eq!(p.finish(), (2, 1));
    }
}
