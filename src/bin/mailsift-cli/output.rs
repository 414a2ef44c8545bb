use anyhow::{Context, Result, bail};
use mailsift::BatchOutcome;

use crate::args::Cli;

pub fn write_report(outcome: &BatchOutcome, cli: &Cli) -> Result<()> {
    match cli.format.as_str() {
        "human" => write_human(outcome),
        "json" => write_json(outcome, cli),
        "ndjson" => write_ndjson(outcome, cli),
        "csv" => write_csv(outcome, cli),
        other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
}

fn write_human(outcome: &BatchOutcome) -> Result<()> {
    print!("{}", render_human(outcome));
    Ok(())
}

/// Valid block then invalid block, one address per line, input order.
fn render_human(outcome: &BatchOutcome) -> String {
    let valid = outcome.valid().count();
    let mut out = format!("[VALID] {valid}\n");
    push_block(&mut out, &outcome.valid_text());
    out.push_str(&format!("\n[INVALID] {}\n", outcome.len() - valid));
    push_block(&mut out, &outcome.invalid_text());
    if outcome.cancelled {
        out.push_str("\n(cancelled)\n");
    }
    out
}

fn push_block(out: &mut String, text: &str) {
    if !text.is_empty() {
        out.push_str(text);
        out.push('\n');
    }
}

fn write_json(outcome: &BatchOutcome, cli: &Cli) -> Result<()> {
    let s = serde_json::to_string_pretty(outcome)?;
    if let Some(path) = &cli.out {
        write_all_atomically(path, s.as_bytes())?;
    } else {
        println!("{s}");
    }
    Ok(())
}

fn write_ndjson(outcome: &BatchOutcome, cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut buf = Vec::new();
        for row in &outcome.results {
            let line = serde_json::to_string(row)?;
            buf.extend_from_slice(line.as_bytes());
            buf.push(b'\n');
        }
        write_all_atomically(path, &buf)?;
    } else {
        for row in &outcome.results {
            println!("{}", serde_json::to_string(row)?);
        }
    }
    Ok(())
}

#[cfg(feature = "with-csv")]
fn write_csv(outcome: &BatchOutcome, cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_csv_rows(&mut wtr, outcome)?;
        let data = wtr.into_inner()?;
        write_all_atomically(path, &data)?;
    } else {
        let mut wtr = csv::Writer::from_writer(std::io::stdout());
        write_csv_rows(&mut wtr, outcome)?;
        wtr.flush()?;
    }
    Ok(())
}

#[cfg(feature = "with-csv")]
fn write_csv_rows<W: std::io::Write>(wtr: &mut csv::Writer<W>, outcome: &BatchOutcome) -> Result<()> {
    wtr.write_record(["address", "valid", "reason"])?;
    for row in &outcome.results {
        let reason = row.reason.map(|r| r.to_string()).unwrap_or_default();
        wtr.write_record([
            row.address.as_str(),
            if row.valid { "true" } else { "false" },
            reason.as_str(),
        ])?;
    }
    Ok(())
}

#[cfg(not(feature = "with-csv"))]
fn write_csv(_: &BatchOutcome, _: &Cli) -> Result<()> {
    bail!("format=csv requires the 'with-csv' feature")
}

fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let tmp = format!("{path}.tmp");
    {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path).with_context(|| format!("rename {tmp} -> {path}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use mailsift::{BatchOutcome, RejectReason, ValidationResult};

    use super::render_human;

    fn outcome(cancelled: bool) -> BatchOutcome {
        BatchOutcome {
            results: vec![
                ValidationResult::accepted("a@real.com"),
                ValidationResult::rejected("bad-email", RejectReason::InvalidFormat),
                ValidationResult::accepted("b@real.com"),
                ValidationResult::rejected("admin@real.com", RejectReason::RoleBased),
            ],
            cancelled,
        }
    }

    #[test]
    fn human_prints_both_partitions() {
        insta::assert_snapshot!(render_human(&outcome(false)), @r"
        [VALID] 2
        a@real.com
        b@real.com

        [INVALID] 2
        bad-email
        admin@real.com
        ");
    }

    #[test]
    fn human_marks_cancelled_runs() {
        let text = render_human(&outcome(true));
        assert!(text.ends_with("\n(cancelled)\n"));
    }

    #[test]
    fn human_empty_partition_has_no_rows() {
        let all_valid = BatchOutcome {
            results: vec![ValidationResult::accepted("a@real.com")],
            cancelled: false,
        };
        assert_eq!(render_human(&all_valid), "[VALID] 1\na@real.com\n\n[INVALID] 0\n");
    }
}
