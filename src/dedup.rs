// src/dedup.rs

use crate::models::ExtractionResult;
use log::debug;
use std::collections::HashSet;

/// 去掉在前面子章节中已经出现过的视频，避免重复下载。
///
/// 按提取结果的插入顺序处理；视频地址重复的 Unit 会被整个移除，即使它还带有
/// 媒体或文档地址。没有视频的 Unit 互不视为重复。
pub fn remove_repeated_video_urls(all_units: ExtractionResult) -> ExtractionResult {
    let mut seen: HashSet<String> = HashSet::new();
    all_units
        .into_iter()
        .map(|(url, units)| {
            let kept = units
                .into_iter()
                .filter(|unit| match &unit.video_url {
                    Some(video) if !video.is_empty() => {
                        let first = seen.insert(video.clone());
                        if !first {
                            debug!("'{}' 中的视频 {} 已出现过，移除该单元", url, video);
                        }
                        first
                    }
                    _ => true,
                })
                .collect();
            (url, kept)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Unit;

    fn video(id: &str) -> Unit {
        Unit::video_only(id)
    }

    fn docs(url: &str) -> Unit {
        Unit {
            document_urls: vec![url.to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_later_repeat_is_dropped_wholesale() {
        let mut repeated = video("AAAAAAAAAAA");
        repeated.document_urls.push("https://x/handout.pdf".into());

        let mut input = ExtractionResult::new();
        input.insert("a", vec![video("AAAAAAAAAAA")]);
        input.insert("b", vec![repeated, video("BBBBBBBBBBB")]);

        let output = remove_repeated_video_urls(input);
        assert_eq!(output.get("a").unwrap(), &[video("AAAAAAAAAAA")]);
        assert_eq!(output.get("b").unwrap(), &[video("BBBBBBBBBBB")]);
    }

    #[test]
    fn test_units_without_video_are_never_duplicates() {
        let mut input = ExtractionResult::new();
        input.insert("a", vec![docs("https://x/1.pdf"), docs("https://x/1.pdf")]);
        input.insert("b", vec![Unit::default(), docs("https://x/2.pdf")]);

        let output = remove_repeated_video_urls(input);
        assert_eq!(output.get("a").map(|u| u.len()), Some(2));
        assert_eq!(output.get("b").map(|u| u.len()), Some(2));
    }

    #[test]
    fn test_repeat_within_same_subsection_and_keys_survive() {
        let mut input = ExtractionResult::new();
        input.insert("a", vec![video("AAAAAAAAAAA"), video("AAAAAAAAAAA")]);
        input.insert("b", vec![video("AAAAAAAAAAA")]);

        let output = remove_repeated_video_urls(input);
        assert_eq!(output.get("a").map(|u| u.len()), Some(1));
        assert_eq!(output.get("b"), Some(&[][..]));
        let keys: Vec<&str> = output.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
