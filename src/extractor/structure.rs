// src/extractor/structure.rs

use crate::{
    client::PageFetcher,
    config::PlatformConfig,
    constants::paths,
    error::*,
    models::{Course, CourseState, Section, SubSection},
};
use log::{debug, info, warn};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static COURSE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article.course").unwrap());
static CHAPTER_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.chapter").unwrap());
static H3_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3").unwrap());
static H3_LINK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3 a").unwrap());
static LINK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
static LIST_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ul").unwrap());
static ITEM_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static PARAGRAPH_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(parent: ElementRef, selector: &Selector) -> Option<String> {
    parent.select(selector).next().map(element_text)
}

/// 从仪表盘页面解析课程列表
pub fn parse_courses(html: &str, platform: &PlatformConfig) -> Vec<Course> {
    let document = Html::parse_document(html);
    document
        .select(&COURSE_SEL)
        .map(|article| {
            let name = first_text(article, &H3_SEL).unwrap_or_default();
            let href = article
                .select(&LINK_SEL)
                .next()
                .and_then(|a| a.value().attr("href"));

            let Some(href) = href else {
                debug!("课程 '{}' 没有链接，标记为未开课", name);
                return Course {
                    id: None,
                    name,
                    url: None,
                    state: CourseState::NotStarted,
                };
            };

            let url = platform.absolute_url(href);
            let state = if url.trim_end_matches('/').ends_with(paths::INFO_MARKER) {
                CourseState::Started
            } else {
                CourseState::NotStarted
            };
            Course {
                id: course_id_from_href(href),
                name,
                url: Some(url),
                state,
            }
        })
        .collect()
}

/// 课程 ID 即路径 `/courses/{org}/{number}/{run}/info` 中间的部分
fn course_id_from_href(href: &str) -> Option<String> {
    let path = href.trim_end_matches('/');
    let path = path.strip_prefix(paths::COURSES_PREFIX).unwrap_or(path);
    let path = path
        .strip_suffix(paths::INFO_MARKER)
        .map(|p| p.trim_end_matches('/'))
        .unwrap_or(path);
    (!path.is_empty()).then(|| path.to_string())
}

/// 从课程目录页面解析章节及其子章节，位置按文档顺序从 1 开始编号
pub fn parse_sections(html: &str, platform: &PlatformConfig) -> Vec<Section> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let container = match Selector::parse(&platform.courseware_selector) {
        Ok(selector) => document.select(&selector).next(),
        Err(e) => {
            warn!(
                "平台 '{}' 的目录选择器 '{}' 无效: {:?}",
                platform.key, platform.courseware_selector, e
            );
            None
        }
    };
    let scope = container.unwrap_or_else(|| {
        debug!("未找到课程目录容器，在整个页面中查找章节");
        root
    });

    scope
        .select(&CHAPTER_SEL)
        .enumerate()
        .map(|(i, chapter)| parse_section(chapter, i + 1, platform))
        .collect()
}

fn parse_section(chapter: ElementRef, position: usize, platform: &PlatformConfig) -> Section {
    let name = first_text(chapter, &H3_LINK_SEL)
        .or_else(|| first_text(chapter, &H3_SEL))
        .unwrap_or_default();
    let list = chapter.select(&LIST_SEL).next();

    let url = list
        .and_then(|ul| ul.select(&LINK_SEL).next())
        .and_then(|a| a.value().attr("href"))
        .map(|href| platform.absolute_url(href))
        .unwrap_or_default();

    let subsections = list
        .map(|ul| {
            ul.select(&ITEM_SEL)
                .filter_map(|li| {
                    let link = li.select(&LINK_SEL).next()?;
                    let href = link.value().attr("href")?;
                    let name = first_text(li, &PARAGRAPH_SEL).unwrap_or_else(|| element_text(link));
                    Some((name, platform.absolute_url(href)))
                })
                .enumerate()
                .map(|(i, (name, url))| SubSection {
                    position: i + 1,
                    name,
                    url,
                })
                .collect()
        })
        .unwrap_or_default();

    Section {
        position,
        name,
        url,
        subsections,
    }
}

pub async fn fetch_courses(
    fetcher: &dyn PageFetcher,
    platform: &PlatformConfig,
) -> AppResult<Vec<Course>> {
    let dashboard = fetcher.fetch(&platform.dashboard_url()).await?;
    let courses = parse_courses(&dashboard, platform);
    info!("仪表盘中共有 {} 门课程", courses.len());
    Ok(courses)
}

/// 课程首页地址中的 info 换成 courseware 即为课程目录页
pub fn courseware_url(course_url: &str) -> String {
    let trimmed = course_url.trim_end_matches('/');
    match trimmed
        .strip_suffix(paths::INFO_MARKER)
        .filter(|prefix| prefix.ends_with('/'))
    {
        Some(prefix) => format!("{}{}", prefix, paths::COURSEWARE_MARKER),
        None => course_url.to_string(),
    }
}

pub async fn fetch_sections(
    fetcher: &dyn PageFetcher,
    platform: &PlatformConfig,
    course: &Course,
) -> AppResult<Vec<Section>> {
    let Some(url) = course.url.as_deref() else {
        warn!("课程 '{}' 没有链接，无法获取章节", course.name);
        return Ok(Vec::new());
    };
    let page = fetcher.fetch(&courseware_url(url)).await?;
    let sections = parse_sections(&page, platform);
    info!("课程 '{}' 共有 {} 个章节", course.name, sections.len());
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform() -> PlatformConfig {
        PlatformConfig::new(
            "edx",
            "https://courses.edx.org",
            r#"nav[aria-label="Course Navigation"]"#,
        )
    }

    const DASHBOARD: &str = r#"
        <ul class="listing-courses">
          <li><article class="course">
            <a href="/courses/BerkeleyX/CS191x/2013_Spring/info"><img/></a>
            <h3> Quantum Mechanics </h3>
          </article></li>
          <li><article class="course">
            <a href="/courses/course-v1:MITx+6.00x+2T2015/about"></a>
            <h3>Intro to CS</h3>
          </article></li>
          <li><article class="course">
            <h3>Hidden Course</h3>
          </article></li>
        </ul>"#;

    #[test]
    fn test_parse_courses() {
        let courses = parse_courses(DASHBOARD, &platform());
        assert_eq!(courses.len(), 3);

        assert_eq!(courses[0].name, "Quantum Mechanics");
        assert_eq!(courses[0].id.as_deref(), Some("BerkeleyX/CS191x/2013_Spring"));
        assert_eq!(
            courses[0].url.as_deref(),
            Some("https://courses.edx.org/courses/BerkeleyX/CS191x/2013_Spring/info")
        );
        assert_eq!(courses[0].state, CourseState::Started);

        assert_eq!(courses[1].state, CourseState::NotStarted);
        assert_eq!(
            courses[1].id.as_deref(),
            Some("course-v1:MITx+6.00x+2T2015/about")
        );
    }

    #[test]
    fn test_course_without_link_is_kept_degraded() {
        let courses = parse_courses(DASHBOARD, &platform());
        assert_eq!(
            courses[2],
            Course {
                id: None,
                name: "Hidden Course".into(),
                url: None,
                state: CourseState::NotStarted,
            }
        );
    }

    fn chapter(title: &str, items: &[(&str, &str)]) -> String {
        let lis: String = items
            .iter()
            .map(|(name, href)| {
                format!(r#"<li><a href="{href}"><p>{name}</p><p class="subtitle">due</p></a></li>"#)
            })
            .collect();
        format!(
            r##"<div class="chapter"><h3><a href="#">{title}</a></h3><ul>{lis}</ul></div>"##
        )
    }

    #[test]
    fn test_parse_sections_positions_follow_document_order() {
        let html = format!(
            r#"<html><body><nav aria-label="Course Navigation">{}{}{}</nav></body></html>"#,
            chapter("Week 1", &[("Intro", "/courses/c/courseware/w1/s1/")]),
            chapter(
                "Week 2",
                &[
                    ("Lecture A", "/courses/c/courseware/w2/s1/"),
                    ("Lecture B", "/courses/c/courseware/w2/s2/")
                ]
            ),
            chapter("Week 3", &[]),
        );
        let sections = parse_sections(&html, &platform());
        assert_eq!(sections.len(), 3);
        let positions: Vec<usize> = sections.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);

        assert_eq!(sections[0].name, "Week 1");
        assert_eq!(sections[0].url, "https://courses.edx.org/courses/c/courseware/w1/s1/");

        let week2 = &sections[1];
        assert_eq!(week2.subsections.len(), 2);
        assert_eq!(week2.subsections[1].position, 2);
        assert_eq!(week2.subsections[1].name, "Lecture B");
        assert_eq!(
            week2.subsections[1].url,
            "https://courses.edx.org/courses/c/courseware/w2/s2/"
        );

        assert!(sections[2].subsections.is_empty());
        assert_eq!(sections[2].url, "");
    }

    #[test]
    fn test_parse_sections_without_container_scans_whole_page() {
        let html = format!("<div>{}</div>", chapter("Only", &[("One", "/x/")]));
        let sections = parse_sections(&html, &platform());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].subsections[0].name, "One");
    }

    #[test]
    fn test_courseware_url() {
        assert_eq!(
            courseware_url("https://courses.edx.org/courses/infox/CS1/2014/info"),
            "https://courses.edx.org/courses/infox/CS1/2014/courseware"
        );
        assert_eq!(
            courseware_url("https://courses.edx.org/courses/c/info/"),
            "https://courses.edx.org/courses/c/courseware"
        );
        assert_eq!(
            courseware_url("https://courses.edx.org/courses/c/moreinfo"),
            "https://courses.edx.org/courses/c/moreinfo"
        );
    }
}
