use crate::error::PipelineError;
use crate::types::PhonemeInterval;

/// Substring that introduces the phoneme tier in the aligner's output.
pub const PHONE_TIER_MARKER: &str = "phone";
/// Reserved label for synthetic intervals outside the aligned tier.
pub const NO_OP_LABEL: &str = "NOP";
/// Alignment tools round their interval bounds; timing comparisons are
/// tolerance-bounded rather than exact.
pub const TIMING_EPS: f64 = 1e-6;

/// Parses the forced aligner's textual output into a contiguous phoneme
/// timeline covering exactly [0, duration_s].
///
/// The stream is scanned to the first line containing
/// [`PHONE_TIER_MARKER`], then the tier start time, tier end time,
/// interval count and that many (start, end, "label") line triples are
/// read. Synthetic [`NO_OP_LABEL`] intervals cover whatever the tier
/// leaves uncovered at either end of the utterance.
pub fn parse_phone_tier(
    text: &str,
    duration_s: f64,
) -> Result<Vec<PhonemeInterval>, PipelineError> {
    if !duration_s.is_finite() || duration_s < 0.0 {
        return Err(PipelineError::invalid_input(format!(
            "utterance duration must be a non-negative number, got {duration_s}"
        )));
    }

    let mut lines = text.lines();
    if !lines.any(|line| line.contains(PHONE_TIER_MARKER)) {
        return Err(PipelineError::format(format!(
            "no line containing {PHONE_TIER_MARKER:?} before end of stream"
        )));
    }

    let tier_start = parse_time_line(lines.next(), "phoneme tier start")?;
    let tier_end = parse_time_line(lines.next(), "phoneme tier end")?;
    let count = parse_count_line(lines.next())?;

    if tier_end > duration_s + TIMING_EPS {
        return Err(PipelineError::timing(format!(
            "phoneme tier ends at {tier_end}s but the audio is {duration_s}s long"
        )));
    }
    if tier_start < -TIMING_EPS || tier_start > tier_end + TIMING_EPS {
        return Err(PipelineError::timing(format!(
            "phoneme tier spans [{tier_start}s, {tier_end}s]"
        )));
    }
    let tier_start = tier_start.clamp(0.0, duration_s);
    let tier_end = tier_end.clamp(tier_start, duration_s);

    let mut intervals = Vec::with_capacity(count + 2);
    if tier_start > TIMING_EPS {
        intervals.push(PhonemeInterval::new(0.0, tier_start, NO_OP_LABEL));
    }

    // Triple starts are checked against the running cursor and then
    // snapped to it, so the returned sequence is exactly contiguous.
    let mut cursor = tier_start;
    for index in 0..count {
        let start = parse_interval_time(lines.next(), index, "start")?;
        let end = parse_interval_time(lines.next(), index, "end")?;
        let label = parse_label_line(lines.next(), index)?;

        if (start - cursor).abs() > TIMING_EPS {
            return Err(PipelineError::timing(format!(
                "interval {index} starts at {start}s, expected {cursor}s (gap or overlap)"
            )));
        }
        if end < cursor - TIMING_EPS {
            return Err(PipelineError::timing(format!(
                "interval {index} ends at {end}s, before its start {cursor}s"
            )));
        }
        let end = end.max(cursor);
        intervals.push(PhonemeInterval::new(cursor, end, label));
        cursor = end;
    }

    if count == 0 && tier_end > tier_start + TIMING_EPS {
        intervals.push(PhonemeInterval::new(tier_start, tier_end, NO_OP_LABEL));
        cursor = tier_end;
    }

    if (cursor - tier_end).abs() > TIMING_EPS {
        return Err(PipelineError::timing(format!(
            "tier header claims end {tier_end}s but intervals end at {cursor}s"
        )));
    }

    if tier_end < duration_s - TIMING_EPS {
        intervals.push(PhonemeInterval::new(cursor, duration_s, NO_OP_LABEL));
    } else if let Some(last) = intervals.last_mut() {
        last.end_s = duration_s;
    }
    if intervals.is_empty() {
        intervals.push(PhonemeInterval::new(0.0, duration_s, NO_OP_LABEL));
    }

    Ok(intervals)
}

fn parse_time_line(line: Option<&str>, what: &str) -> Result<f64, PipelineError> {
    let line =
        line.ok_or_else(|| PipelineError::format(format!("missing {what} line")))?;
    let value: f64 = line
        .trim()
        .parse()
        .map_err(|_| PipelineError::format(format!("{what} is not a number: {line:?}")))?;
    if !value.is_finite() {
        return Err(PipelineError::format(format!(
            "{what} is not a finite number: {line:?}"
        )));
    }
    Ok(value)
}

fn parse_count_line(line: Option<&str>) -> Result<usize, PipelineError> {
    let line = line
        .ok_or_else(|| PipelineError::format("missing interval count line".to_string()))?;
    line.trim().parse().map_err(|_| {
        PipelineError::format(format!(
            "interval count is not a non-negative integer: {line:?}"
        ))
    })
}

fn parse_interval_time(
    line: Option<&str>,
    index: usize,
    which: &str,
) -> Result<f64, PipelineError> {
    let line = line.ok_or_else(|| {
        PipelineError::format(format!(
            "stream ended before {which} of interval {index} (tier count too large?)"
        ))
    })?;
    let value: f64 = line.trim().parse().map_err(|_| {
        PipelineError::format(format!(
            "interval {index} {which} is not a number: {line:?}"
        ))
    })?;
    if !value.is_finite() {
        return Err(PipelineError::format(format!(
            "interval {index} {which} is not a finite number: {line:?}"
        )));
    }
    Ok(value)
}

fn parse_label_line(line: Option<&str>, index: usize) -> Result<String, PipelineError> {
    let line = line.ok_or_else(|| {
        PipelineError::format(format!("stream ended before label of interval {index}"))
    })?;
    Ok(line.trim().replace('"', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier_text(tier_start: f64, tier_end: f64, triples: &[(f64, f64, &str)]) -> String {
        let mut out = String::from(
            "File type = \"ooTextFile short\"\n\"TextGrid\"\nheader noise\n\"phone\"\n",
        );
        out.push_str(&format!("{tier_start}\n{tier_end}\n{}\n", triples.len()));
        for (start, end, label) in triples {
            out.push_str(&format!("{start}\n{end}\n\"{label}\"\n"));
        }
        out
    }

    #[test]
    fn parses_tier_with_boundary_padding() {
        let text = tier_text(0.5, 2.5, &[(0.5, 1.5, "K"), (1.5, 2.5, "T")]);
        let intervals = parse_phone_tier(&text, 3.0).expect("valid alignment");
        assert_eq!(intervals.len(), 4);
        assert_eq!(intervals[0], PhonemeInterval::new(0.0, 0.5, NO_OP_LABEL));
        assert_eq!(intervals[1], PhonemeInterval::new(0.5, 1.5, "K"));
        assert_eq!(intervals[2], PhonemeInterval::new(1.5, 2.5, "T"));
        assert_eq!(intervals[3], PhonemeInterval::new(2.5, 3.0, NO_OP_LABEL));
    }

    #[test]
    fn timeline_is_contiguous_and_covers_duration() {
        let text = tier_text(0.25, 1.75, &[(0.25, 1.0, "AH0"), (1.0, 1.75, "sil")]);
        let intervals = parse_phone_tier(&text, 2.0).expect("valid alignment");
        assert_eq!(intervals.first().unwrap().start_s, 0.0);
        assert_eq!(intervals.last().unwrap().end_s, 2.0);
        for pair in intervals.windows(2) {
            assert_eq!(pair[0].end_s, pair[1].start_s);
        }
        let total: f64 = intervals.iter().map(|iv| iv.end_s - iv.start_s).sum();
        assert!((total - 2.0).abs() < 1e-9);
    }

    #[test]
    fn strips_quotes_from_labels() {
        let text = tier_text(0.0, 1.0, &[(0.0, 1.0, "HH")]);
        let intervals = parse_phone_tier(&text, 1.0).expect("valid alignment");
        assert_eq!(intervals[0].label, "HH");
    }

    #[test]
    fn tier_covering_whole_utterance_adds_no_padding() {
        let text = tier_text(0.0, 1.0, &[(0.0, 1.0, "M")]);
        let intervals = parse_phone_tier(&text, 1.0).expect("valid alignment");
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].label, "M");
    }

    #[test]
    fn missing_marker_is_format_error() {
        let text = "File type = \"ooTextFile short\"\n0.0\n1.0\n0\n";
        let err = parse_phone_tier(text, 1.0).expect_err("marker is required");
        assert!(matches!(err, PipelineError::AlignmentFormat { .. }));
    }

    #[test]
    fn unparseable_count_is_format_error() {
        let text = "\"phone\"\n0.0\n1.0\nmany\n";
        let err = parse_phone_tier(text, 1.0).expect_err("count must parse");
        assert!(matches!(err, PipelineError::AlignmentFormat { .. }));
    }

    #[test]
    fn negative_count_is_format_error() {
        let text = "\"phone\"\n0.0\n1.0\n-1\n";
        let err = parse_phone_tier(text, 1.0).expect_err("count must be non-negative");
        assert!(matches!(err, PipelineError::AlignmentFormat { .. }));
    }

    #[test]
    fn truncated_triples_is_format_error() {
        // count claims two intervals but only one follows
        let text = "\"phone\"\n0.0\n1.0\n2\n0.0\n0.5\n\"K\"\n";
        let err = parse_phone_tier(text, 1.0).expect_err("triples are short");
        assert!(matches!(err, PipelineError::AlignmentFormat { .. }));
    }

    #[test]
    fn tier_past_audio_end_is_timing_error() {
        let text = tier_text(0.0, 1.5, &[(0.0, 1.5, "K")]);
        let err = parse_phone_tier(&text, 1.0).expect_err("tier exceeds audio");
        assert!(matches!(err, PipelineError::AlignmentTiming { .. }));
    }

    #[test]
    fn tier_end_within_epsilon_is_clamped() {
        let end = 1.0 + 1e-8;
        let text = tier_text(0.0, end, &[(0.0, end, "K")]);
        let intervals = parse_phone_tier(&text, 1.0).expect("epsilon overshoot is tolerated");
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].end_s, 1.0);
    }

    #[test]
    fn gap_between_intervals_is_timing_error() {
        let text = tier_text(0.0, 1.0, &[(0.0, 0.4, "K"), (0.6, 1.0, "T")]);
        let err = parse_phone_tier(&text, 1.0).expect_err("gap must be rejected");
        assert!(matches!(err, PipelineError::AlignmentTiming { .. }));
    }

    #[test]
    fn reversed_interval_is_timing_error() {
        let text = tier_text(0.0, 1.0, &[(0.0, 0.5, "K"), (0.5, 0.2, "T")]);
        let err = parse_phone_tier(&text, 1.0).expect_err("reversed interval");
        assert!(matches!(err, PipelineError::AlignmentTiming { .. }));
    }

    #[test]
    fn empty_tier_becomes_all_no_op() {
        let text = tier_text(0.2, 0.8, &[]);
        let intervals = parse_phone_tier(&text, 1.0).expect("empty tier is valid");
        assert!(intervals.iter().all(|iv| iv.label == NO_OP_LABEL));
        assert_eq!(intervals.first().unwrap().start_s, 0.0);
        assert_eq!(intervals.last().unwrap().end_s, 1.0);
    }

    #[test]
    fn negative_duration_is_invalid_input() {
        let text = tier_text(0.0, 1.0, &[(0.0, 1.0, "K")]);
        let err = parse_phone_tier(&text, -1.0).expect_err("negative duration");
        assert!(matches!(err, PipelineError::InvalidInput { .. }));
    }
}
