// src/transcript.rs

use crate::models::api::TimedTranscript;
use serde_json::Value;
use std::fmt::Write;

/// 将平台的时间轴字幕 JSON 转换为 SRT 文本。格式不符或没有字幕条目时返回 `None`。
pub fn json_to_srt(value: &Value) -> Option<String> {
    let transcript: TimedTranscript = serde_json::from_value(value.clone()).ok()?;
    transcript_to_srt(&transcript)
}

pub fn transcript_to_srt(transcript: &TimedTranscript) -> Option<String> {
    let cues = transcript
        .start
        .iter()
        .zip(&transcript.end)
        .zip(&transcript.text);

    let mut out = String::new();
    for (i, ((start, end), text)) in cues.enumerate() {
        // 写入 String 不会失败
        let _ = write!(
            out,
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_timestamp(*start),
            format_timestamp(*end),
            text.trim()
        );
    }
    (!out.is_empty()).then_some(out)
}

fn format_timestamp(ms: i64) -> String {
    let ms = ms.max(0);
    let (hours, rest) = (ms / 3_600_000, ms % 3_600_000);
    let (minutes, rest) = (rest / 60_000, rest % 60_000);
    let (seconds, millis) = (rest / 1000, rest % 1000);
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_converts_cues() {
        let value = json!({
            "start": [0, 61500, 3723004],
            "end": [1500, 65000, 3725000],
            "text": ["Hello", " world ", "bye"]
        });
        let srt = json_to_srt(&value).unwrap();
        assert_eq!(
            srt,
            "1\n00:00:00,000 --> 00:00:01,500\nHello\n\n\
             2\n00:01:01,500 --> 00:01:05,000\nworld\n\n\
             3\n01:02:03,004 --> 01:02:05,000\nbye\n\n"
        );
    }

    #[test]
    fn test_uneven_arrays_are_truncated() {
        let value = json!({ "start": [0, 1000], "end": [500], "text": ["a", "b"] });
        let srt = json_to_srt(&value).unwrap();
        assert_eq!(srt.matches("-->").count(), 1);
    }

    #[test]
    fn test_malformed_or_empty_is_none() {
        assert!(json_to_srt(&json!({"start": "x"})).is_none());
        assert!(json_to_srt(&json!({})).is_none());
        assert!(json_to_srt(&json!(["en", "zh"])).is_none());
    }
}
