//! Authenticated client for one Semantic MediaWiki installation.
//!
//! A [`MediawikiApi`] owns one HTTP session. Construction logs in through the
//! `clientlogin` token exchange; every later call rides on the session cookies
//! and is a plain request/response round-trip against `api.php` or the
//! `Special:ExportRDF` page.

use crate::config::{WikiConfig, CATEGORY_MEMBER_LIMIT, PROPERTY_FETCH_CONCURRENCY, USER_AGENT};
use crate::content;
use crate::error::{SmwError, SmwResult};
use crate::models::{PageRecord, PropertyDescriptor, PropertyType, PropertyValue};
use crate::ns::{EXPORT_RDF, RDFS_LABEL, SMW_TYPE};
use crate::rdf::{RdfGraph, Term};
use dashmap::DashMap;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

pub struct MediawikiApi {
    /// Base URL as given, sent back as `loginreturnurl`
    return_url: String,
    /// Base URL ending in `/`, for building `index.php` URLs
    url: String,
    api: String,
    verbose: bool,
    http: Client,
    /// Property page title -> descriptor; `None` marks properties without a declared type.
    property_cache: DashMap<String, Option<PropertyDescriptor>>,
}

impl MediawikiApi {
    /// Opens a session and logs in as `username`.
    ///
    /// Fails with [`SmwError::Auth`] if no login token can be obtained or the
    /// wiki answers the login with any status other than `PASS`.
    pub async fn connect(
        url: &str,
        api: &str,
        username: &str,
        password: &str,
        verbose: bool,
    ) -> SmwResult<Self> {
        let http = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .build()?;

        let client = Self {
            return_url: url.to_string(),
            url: normalize_base_url(url),
            api: api.to_string(),
            verbose,
            http,
            property_cache: DashMap::new(),
        };

        let login_token = client.login_token().await?;
        client.login(&login_token, username, password).await?;
        info!(user = username, wiki = %client.url, "Logged in");

        Ok(client)
    }

    pub async fn from_config(config: &WikiConfig) -> SmwResult<Self> {
        Self::connect(
            &config.url,
            &config.api,
            &config.lgname,
            &config.lgpassword,
            config.verbose,
        )
        .await
    }

    pub fn base_url(&self) -> &str {
        &self.url
    }

    pub fn api_url(&self) -> &str {
        &self.api
    }

    async fn get_api(&self, params: &[(&str, &str)]) -> SmwResult<Value> {
        let data: Value = self
            .http
            .get(&self.api)
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        check_api_error(data)
    }

    async fn post_api(&self, params: &[(&str, &str)]) -> SmwResult<Value> {
        let data: Value = self
            .http
            .post(&self.api)
            .form(params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        check_api_error(data)
    }

    async fn login_token(&self) -> SmwResult<String> {
        let data = self
            .get_api(&[
                ("action", "query"),
                ("meta", "tokens"),
                ("type", "login"),
                ("format", "json"),
            ])
            .await
            .map_err(|e| SmwError::Auth(format!("login token request failed: {}", e)))?;

        str_at(&data, "/query/tokens/logintoken")
            .map(str::to_string)
            .ok_or_else(|| SmwError::Auth("response has no query.tokens.logintoken".to_string()))
    }

    async fn login(&self, login_token: &str, username: &str, password: &str) -> SmwResult<()> {
        let data = self
            .post_api(&[
                ("action", "clientlogin"),
                ("loginreturnurl", self.return_url.as_str()),
                ("logintoken", login_token),
                ("username", username),
                ("password", password),
                ("format", "json"),
            ])
            .await
            .map_err(|e| match e {
                SmwError::Api(message) => SmwError::Auth(message),
                other => other,
            })?;

        if self.verbose {
            info!(response = %data, "clientlogin response");
        } else {
            debug!(response = %data, "clientlogin response");
        }

        match str_at(&data, "/clientlogin/status") {
            Some("PASS") => Ok(()),
            status => Err(SmwError::Auth(format!(
                "clientlogin returned {}: {}",
                status.unwrap_or("no status"),
                str_at(&data, "/clientlogin/message").unwrap_or("no message")
            ))),
        }
    }

    async fn csrf_token(&self) -> SmwResult<String> {
        let data = self
            .get_api(&[("action", "query"), ("meta", "tokens"), ("format", "json")])
            .await?;

        str_at(&data, "/query/tokens/csrftoken")
            .map(str::to_string)
            .ok_or_else(|| SmwError::Api("response has no query.tokens.csrftoken".to_string()))
    }

    /// Titles of the first [`CATEGORY_MEMBER_LIMIT`] members of `Category:<category>`.
    ///
    /// Continuation is not followed; larger categories are truncated.
    pub async fn fetch_category(&self, category: &str) -> SmwResult<Vec<String>> {
        let cmtitle = format!("Category:{}", category);
        let cmlimit = CATEGORY_MEMBER_LIMIT.to_string();
        let data = self
            .get_api(&[
                ("action", "query"),
                ("list", "categorymembers"),
                ("cmtitle", cmtitle.as_str()),
                ("cmlimit", cmlimit.as_str()),
                ("format", "json"),
            ])
            .await?;

        let members = data
            .pointer("/query/categorymembers")
            .and_then(Value::as_array)
            .ok_or_else(|| SmwError::Api("response has no query.categorymembers".to_string()))?;

        let titles: Vec<String> = members
            .iter()
            .filter_map(|m| m.get("title").and_then(Value::as_str))
            .take(CATEGORY_MEMBER_LIMIT)
            .map(str::to_string)
            .collect();

        if data.get("continue").is_some() {
            debug!(category, "Category has more members than one page; rest ignored");
        }
        debug!(category, members = titles.len(), "Fetched category");

        Ok(titles)
    }

    /// Raw wikitext of `page`.
    pub async fn fetch_wikitext(&self, page: &str) -> SmwResult<String> {
        let data = self
            .get_api(&[
                ("action", "parse"),
                ("page", page),
                ("prop", "wikitext"),
                ("formatversion", "2"),
                ("format", "json"),
            ])
            .await?;

        str_at(&data, "/parse/wikitext")
            .map(str::to_string)
            .ok_or_else(|| SmwError::Api(format!("no parse.wikitext for page '{}'", page)))
    }

    pub async fn fetch_page(&self, page: &str) -> SmwResult<PageRecord> {
        let wikitext = self.fetch_wikitext(page).await?;
        let free_text = content::extract_free_text(&wikitext);
        let properties = self.fetch_properties(page).await?;

        debug!(page, properties = properties.len(), "Fetched page");

        Ok(PageRecord {
            title: page.to_string(),
            properties,
            free_text,
        })
    }

    /// Fetches and parses the RDF/XML export of `title`.
    pub async fn fetch_rdf(&self, title: &str) -> SmwResult<RdfGraph> {
        let export_url = format!("{}index.php", self.url);
        let export_title = format!("{}{}", EXPORT_RDF, title);
        let response = self
            .http
            .get(&export_url)
            .query(&[("title", export_title.as_str()), ("syntax", "rdf")])
            .send()
            .await?
            .error_for_status()?;

        let base = response.url().to_string();
        let body = response.text().await?;
        let graph = RdfGraph::parse_rdf_xml(&body, Some(&base))?;
        debug!(title, triples = graph.len(), "Fetched RDF export");

        Ok(graph)
    }

    /// Resolves the semantic properties of `page` from its RDF export.
    ///
    /// Only predicates whose IRI contains `Property` are considered, and of
    /// those only the ones whose property page declares a datatype. Output
    /// follows the order of statements in the export.
    ///
    /// A matching predicate outside `Special:URIResolver/` (e.g. `rdfs:subPropertyOf`)
    /// still costs an export request, for a title equal to its whole IRI.
    pub async fn fetch_properties(&self, page: &str) -> SmwResult<Vec<PropertyValue>> {
        let graph = self.fetch_rdf(page).await?;
        let Some(page_uri) = graph.subject_with_label(page) else {
            debug!(page, "No subject labelled with the page title");
            return Ok(Vec::new());
        };

        let statements: Vec<(&str, &Term)> = graph
            .triples_about(page_uri)
            .filter(|t| t.predicate.contains("Property"))
            .map(|t| (t.predicate.as_str(), &t.object))
            .collect();

        let mut predicates: Vec<&str> = Vec::new();
        for &(predicate, _) in &statements {
            if !predicates.contains(&predicate) {
                predicates.push(predicate);
            }
        }

        let descriptors: HashMap<&str, Option<PropertyDescriptor>> = stream::iter(predicates)
            .map(|uri| async move { self.property_descriptor(uri).await.map(|d| (uri, d)) })
            .buffered(PROPERTY_FETCH_CONCURRENCY)
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .collect::<SmwResult<_>>()?;

        let values = statements
            .into_iter()
            .filter_map(|(predicate, object)| {
                let property = descriptors.get(predicate)?.as_ref()?;
                Some(property_value(property.clone(), object))
            })
            .collect();

        Ok(values)
    }

    /// Label and datatype of the property behind a predicate IRI, read from the
    /// property page's own RDF export. `None` if the property declares no type.
    pub async fn property_descriptor(&self, uri: &str) -> SmwResult<Option<PropertyDescriptor>> {
        let title = content::property_title(uri);
        if let Some(cached) = self.property_cache.get(&title).map(|e| e.value().clone()) {
            return Ok(cached);
        }

        let graph = self.fetch_rdf(&title).await?;
        let descriptor = graph.value(uri, SMW_TYPE).map(|datatype| PropertyDescriptor {
            uri: uri.to_string(),
            label: graph
                .value(uri, RDFS_LABEL)
                .map(Term::to_string)
                .unwrap_or_else(|| title.clone()),
            datatype: PropertyType::from_uri(datatype.as_str()),
        });

        if descriptor.is_none() {
            debug!(property = %title, "Property has no declared type, skipping");
        }
        self.property_cache.insert(title, descriptor.clone());

        Ok(descriptor)
    }

    pub fn cached_property_count(&self) -> usize {
        self.property_cache.len()
    }

    pub fn clear_property_cache(&self) {
        self.property_cache.clear();
    }

    /// `fetch_category` followed by `fetch_page` for every member, stopping at the first failure.
    pub async fn fetch_category_pages(&self, category: &str) -> SmwResult<Vec<PageRecord>> {
        let titles = self.fetch_category(category).await?;
        let mut pages = Vec::with_capacity(titles.len());
        for title in &titles {
            pages.push(self.fetch_page(title).await?);
        }
        Ok(pages)
    }

    /// Creates `title` or replaces its text with `content`.
    pub async fn create_page(&self, title: &str, content: &str) -> SmwResult<()> {
        let csrf_token = self.csrf_token().await?;
        let data = self
            .post_api(&[
                ("action", "edit"),
                ("title", title),
                ("token", csrf_token.as_str()),
                ("text", content),
                ("format", "json"),
            ])
            .await?;

        if let Some(result) = str_at(&data, "/edit/result") {
            if result != "Success" {
                return Err(SmwError::Api(format!(
                    "edit of '{}' returned {}",
                    title, result
                )));
            }
        }

        if self.verbose {
            info!(title, "Page created");
        } else {
            debug!(title, "Page created");
        }

        Ok(())
    }
}

fn normalize_base_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

fn str_at<'a>(data: &'a Value, pointer: &str) -> Option<&'a str> {
    data.pointer(pointer).and_then(Value::as_str)
}

/// Turns a MediaWiki `{"error": {...}}` envelope into [`SmwError::Api`].
fn check_api_error(data: Value) -> SmwResult<Value> {
    if let Some(error) = data.get("error") {
        let code = error.get("code").and_then(Value::as_str).unwrap_or("unknown");
        let info = error.get("info").and_then(Value::as_str).unwrap_or("");
        return Err(SmwError::Api(format!("{}: {}", code, info)));
    }
    Ok(data)
}

fn property_value(property: PropertyDescriptor, object: &Term) -> PropertyValue {
    let value = object.to_string();
    let label = (property.datatype == PropertyType::WikiPage).then(|| content::page_label(&value));
    PropertyValue {
        property,
        value,
        label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(datatype: PropertyType) -> PropertyDescriptor {
        PropertyDescriptor {
            uri: "http://wiki.test/Special:URIResolver/Property-3AP".to_string(),
            label: "P".to_string(),
            datatype,
        }
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        assert_eq!(normalize_base_url("http://wiki.test"), "http://wiki.test/");
        assert_eq!(normalize_base_url("http://wiki.test/"), "http://wiki.test/");
    }

    #[test]
    fn error_envelope_becomes_api_error() {
        let data = json!({"error": {"code": "missingtitle", "info": "The page doesn't exist."}});
        match check_api_error(data) {
            Err(SmwError::Api(message)) => {
                assert_eq!(message, "missingtitle: The page doesn't exist.")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn regular_response_passes_through() {
        let data = json!({"query": {"tokens": {"csrftoken": "+\\"}}});
        let checked = check_api_error(data.clone()).unwrap();
        assert_eq!(checked, data);
    }

    #[test]
    fn wiki_page_value_gets_label() {
        let object = Term::Iri("http://wiki.test/Special:URIResolver/Some_Page-3AFoo".to_string());
        let value = property_value(descriptor(PropertyType::WikiPage), &object);
        assert_eq!(value.value, "http://wiki.test/Special:URIResolver/Some_Page-3AFoo");
        assert_eq!(value.label.as_deref(), Some("Some Page:Foo"));
    }

    #[test]
    fn literal_value_is_lexical_form_without_label() {
        let object = Term::Literal {
            value: "1901-02-03".to_string(),
            datatype: Some("http://www.w3.org/2001/XMLSchema#date".to_string()),
            language: None,
        };
        let value = property_value(descriptor(PropertyType::Date), &object);
        assert_eq!(value.value, "1901-02-03");
        assert_eq!(value.label, None);
    }

    #[test]
    fn uri_value_is_not_decoded() {
        let object = Term::Iri("http://example.org/a_b".to_string());
        let value = property_value(descriptor(PropertyType::Uri), &object);
        assert_eq!(value.value, "http://example.org/a_b");
        assert_eq!(value.label, None);
    }
}
