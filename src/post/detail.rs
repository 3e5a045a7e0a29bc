use serde::{Deserialize, Serialize};

use crate::{
    error::NormalizeError,
    prismic::{RawContentBlock, RawDocument},
};

const WORDS_PER_MINUTE: usize = 200;

/// A full article. The uid is not part of it, pages are keyed by uid instead.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PostDetail {
    pub first_publication_date: Option<String>,
    pub data: PostDetailData,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct PostDetailData {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub banner: Option<Banner>,
    pub content: Option<Vec<ContentBlock>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Banner {
    pub url: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ContentBlock {
    pub heading: Option<String>,
    pub body: Option<Vec<Paragraph>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub text: Option<String>,
}

impl PostDetail {
    pub fn content(&self) -> &[ContentBlock] {
        self.data.content.as_deref().unwrap_or_default()
    }

    /// Estimated minutes to read headings and paragraphs, rounded up.
    pub fn reading_time(&self) -> usize {
        let words: usize = self
            .content()
            .iter()
            .map(|block| {
                let heading = block.heading.as_deref().map(count_words).unwrap_or(0);
                let body: usize = block
                    .paragraphs()
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .map(count_words)
                    .sum();
                heading + body
            })
            .sum();

        words.div_ceil(WORDS_PER_MINUTE)
    }
}

impl ContentBlock {
    pub fn paragraphs(&self) -> &[Paragraph] {
        self.body.as_deref().unwrap_or_default()
    }
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

impl From<RawContentBlock> for ContentBlock {
    fn from(value: RawContentBlock) -> Self {
        Self {
            heading: value.heading,
            body: value.body.map(|nodes| {
                nodes
                    .into_iter()
                    .map(|node| Paragraph { text: node.text })
                    .collect()
            }),
        }
    }
}

pub fn normalize_detail(raw: RawDocument) -> Result<PostDetail, NormalizeError> {
    let uid = raw.uid.ok_or(NormalizeError::MissingUid)?;
    let Some(data) = raw.data else {
        return Err(NormalizeError::MissingData(uid));
    };

    Ok(PostDetail {
        first_publication_date: raw.first_publication_date,
        data: PostDetailData {
            title: data.title,
            subtitle: data.subtitle,
            author: data.author,
            banner: data.banner.map(|banner| Banner { url: banner.url }),
            content: data
                .content
                .map(|blocks| blocks.into_iter().map(ContentBlock::from).collect()),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> RawDocument {
        serde_json::from_value(json!({
            "uid": "criando-um-app-cra-do-zero",
            "first_publication_date": "2021-03-25T19:27:35+0000",
            "data": {
                "title": "Criando um app CRA do zero",
                "subtitle": "Tudo sobre como criar a sua primeira aplicação",
                "author": "Danilo Vieira",
                "banner": { "url": "https://images.prismic.io/banner.png", "dimensions": { "width": 1440, "height": 400 } },
                "content": [
                    {
                        "heading": "Proin et varius",
                        "body": [
                            { "type": "paragraph", "text": "Lorem ipsum dolor sit amet", "spans": [] },
                            { "type": "list-item", "text": "Nullam dolor sapien", "spans": [{ "start": 0, "end": 6, "type": "strong" }] }
                        ]
                    },
                    {
                        "heading": "Cras laoreet mi",
                        "body": [{ "type": "paragraph", "text": "Nulla auctor sit amet quam vitae commodo", "spans": [] }]
                    }
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_normalize_detail() {
        let post = normalize_detail(document()).unwrap();
        assert_eq!(post.data.title.as_deref(), Some("Criando um app CRA do zero"));
        assert_eq!(
            post.data.banner,
            Some(Banner {
                url: Some("https://images.prismic.io/banner.png".to_string())
            })
        );

        let headings: Vec<_> = post
            .content()
            .iter()
            .map(|b| b.heading.as_deref().unwrap())
            .collect();
        assert_eq!(headings, vec!["Proin et varius", "Cras laoreet mi"]);
        assert_eq!(
            post.content()[0].paragraphs()[1].text.as_deref(),
            Some("Nullam dolor sapien")
        );
    }

    #[test]
    fn test_missing_banner_and_content() {
        let raw: RawDocument = serde_json::from_value(json!({
            "uid": "sem-banner",
            "first_publication_date": null,
            "data": { "title": "Sem banner", "banner": {} }
        }))
        .unwrap();

        let post = normalize_detail(raw).unwrap();
        assert_eq!(post.data.banner, Some(Banner { url: None }));
        assert_eq!(post.data.content, None);
        assert!(post.content().is_empty());
        assert_eq!(post.reading_time(), 0);
    }

    #[test]
    fn test_detail_without_uid() {
        let mut raw = document();
        raw.uid = None;
        assert_eq!(normalize_detail(raw), Err(NormalizeError::MissingUid));
    }

    #[test]
    fn test_block_without_body_stays_empty() {
        let raw: RawDocument = serde_json::from_value(json!({
            "uid": "x",
            "data": { "content": [{ "heading": "Só o título" }, { "heading": "Vazio", "body": [] }] }
        }))
        .unwrap();

        let post = normalize_detail(raw).unwrap();
        assert_eq!(post.content()[0].body, None);
        assert!(post.content()[0].paragraphs().is_empty());
        assert_eq!(post.content()[1].body, Some(vec![]));

        let json = serde_json::to_value(&post).unwrap();
        assert!(json["data"]["content"][0]["body"].is_null());
        assert_eq!(json["data"]["content"][1]["body"], json!([]));
        assert_eq!(post.reading_time(), 1);
    }

    #[test]
    fn test_reading_time() {
        // 3 + 5 + 3 + 3 + 7 words
        let post = normalize_detail(document()).unwrap();
        assert_eq!(post.reading_time(), 1);

        let mut long = post.clone();
        long.data.content = Some(vec![ContentBlock {
            heading: Some("Título".to_string()),
            body: Some(vec![Paragraph {
                text: Some("palavra ".repeat(399)),
            }]),
        }]);
        assert_eq!(long.reading_time(), 2);

        let block = &mut long.data.content.as_mut().unwrap()[0];
        block.body.as_mut().unwrap().push(Paragraph {
            text: Some("mais".to_string()),
        });
        assert_eq!(long.reading_time(), 3);
    }
}
