//! Postal code center coordinates from the external coordinate service
//!
//! The service is queried with `?postalCodes=a,b,c` and answers with XML in
//! which every `member` element holds a `postinumeroalue` (the postal code)
//! and a `pos` of two space separated numbers in EPSG:3067.

use crate::app_config::CoordinatesConfig;
use crate::orm::postal_codes::{self, CoordinateState};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use quick_xml::events::Event;
use quick_xml::Reader;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum ImportError {
    Http(String),
    Xml(String),
    Database(DbErr),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Http(msg) => write!(f, "Coordinate service request failed: {}", msg),
            ImportError::Xml(msg) => write!(f, "Malformed coordinate response: {}", msg),
            ImportError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<reqwest::Error> for ImportError {
    fn from(e: reqwest::Error) -> Self {
        ImportError::Http(e.to_string())
    }
}

impl From<quick_xml::Error> for ImportError {
    fn from(e: quick_xml::Error) -> Self {
        ImportError::Xml(e.to_string())
    }
}

impl From<DbErr> for ImportError {
    fn from(e: DbErr) -> Self {
        ImportError::Database(e)
    }
}

/// One `member` of a service response, position still unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateRecord {
    pub code: String,
    pub pos: String,
}

#[async_trait]
pub trait CoordinateProvider: Send + Sync {
    async fn fetch(&self, codes: &[String]) -> Result<Vec<CoordinateRecord>, ImportError>;
}

pub struct HttpCoordinateProvider {
    client: reqwest::Client,
    service_url: url::Url,
}

impl HttpCoordinateProvider {
    pub fn new(config: &CoordinatesConfig) -> Result<Self, ImportError> {
        let service_url = url::Url::parse(&config.service_url)
            .map_err(|e| ImportError::Http(format!("invalid service url: {}", e)))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            service_url,
        })
    }
}

#[async_trait]
impl CoordinateProvider for HttpCoordinateProvider {
    async fn fetch(&self, codes: &[String]) -> Result<Vec<CoordinateRecord>, ImportError> {
        let body = self
            .client
            .get(self.service_url.clone())
            .query(&[("postalCodes", codes.join(","))])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_response(&body)
    }
}

/// Extract the postal code and position of every `member` element.
/// Namespace prefixes are ignored.
pub fn parse_response(xml: &str) -> Result<Vec<CoordinateRecord>, ImportError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Field {
        Code,
        Pos,
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut in_member = false;
    let mut code: Option<String> = None;
    let mut pos: Option<String> = None;
    let mut field: Option<Field> = None;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"member" => {
                    in_member = true;
                    code = None;
                    pos = None;
                }
                b"postinumeroalue" if in_member => field = Some(Field::Code),
                b"pos" if in_member => field = Some(Field::Pos),
                _ => {}
            },
            Event::Text(t) => {
                if let Some(f) = field {
                    let text = t
                        .unescape()
                        .map_err(|e| ImportError::Xml(e.to_string()))?
                        .trim()
                        .to_string();
                    match f {
                        Field::Code => code = Some(text),
                        Field::Pos => pos = Some(text),
                    }
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"member" => {
                    in_member = false;
                    if let Some(code) = code.take() {
                        records.push(CoordinateRecord {
                            code,
                            pos: pos.take().unwrap_or_default(),
                        });
                    }
                }
                b"postinumeroalue" | b"pos" => field = None,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(records)
}

/// Parse `"x y"` into a coordinate pair.
pub fn parse_position(pos: &str) -> Option<(f64, f64)> {
    let mut parts = pos.split_whitespace();
    let x = parts.next()?.parse::<f64>().ok()?;
    let y = parts.next()?.parse::<f64>().ok()?;
    if parts.next().is_some() || !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some((x, y))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    pub batch_size: u64,
    pub one_by_one: bool,
}

impl From<&CoordinatesConfig> for ImportOptions {
    fn from(config: &CoordinatesConfig) -> Self {
        Self {
            batch_size: config.batch_size.max(1),
            one_by_one: config.one_by_one,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub processed: usize,
    pub updated: usize,
    pub not_received: usize,
    pub wrong_format: usize,
    /// Requests made to the service
    pub batches: usize,
}

/// Download coordinates for every stored postal code.
///
/// Postal codes are paged in code order. Each page is written in its own
/// transaction, so a failed request leaves earlier pages committed.
pub async fn import_coordinates(
    db: &DatabaseConnection,
    provider: &dyn CoordinateProvider,
    options: &ImportOptions,
    now: NaiveDateTime,
) -> Result<ImportReport, ImportError> {
    let batch_size = options.batch_size.max(1);
    let mut report = ImportReport::default();
    let mut after: Option<String> = None;

    loop {
        let mut query = postal_codes::Entity::find().order_by_asc(postal_codes::Column::Code);
        if let Some(last) = &after {
            query = query.filter(postal_codes::Column::Code.gt(last.as_str()));
        }
        let page = query.limit(batch_size).all(db).await?;
        if page.is_empty() {
            break;
        }
        let short = (page.len() as u64) < batch_size;
        after = page.last().map(|p| p.code.clone());

        if options.one_by_one {
            for row in page {
                let records = provider.fetch(&[row.code.clone()]).await?;
                report.batches += 1;
                apply_records(db, vec![row], &records, &mut report, now).await?;
            }
        } else {
            let codes: Vec<String> = page.iter().map(|p| p.code.clone()).collect();
            let records = provider.fetch(&codes).await?;
            report.batches += 1;
            apply_records(db, page, &records, &mut report, now).await?;
        }

        log::info!(
            "Coordinates: {} postal codes processed, {} updated",
            report.processed,
            report.updated
        );
        if short {
            break;
        }
    }

    log::info!(
        "Coordinate import done: {} updated, {} not received, {} wrong format in {} request(s)",
        report.updated,
        report.not_received,
        report.wrong_format,
        report.batches
    );
    Ok(report)
}

async fn apply_records(
    db: &DatabaseConnection,
    rows: Vec<postal_codes::Model>,
    records: &[CoordinateRecord],
    report: &mut ImportReport,
    now: NaiveDateTime,
) -> Result<(), ImportError> {
    let mut positions: HashMap<&str, &str> = HashMap::new();
    for record in records {
        positions
            .entry(record.code.as_str())
            .or_insert(record.pos.as_str());
    }

    let txn = db.begin().await?;
    for row in rows {
        let code = row.code.clone();
        let mut active: postal_codes::ActiveModel = row.into();
        match positions.get(code.as_str()) {
            None => {
                active.coordinate_state = Set(CoordinateState::NotReceived);
                report.not_received += 1;
            }
            Some(pos) => match parse_position(pos) {
                Some((x, y)) => {
                    active.center_x = Set(Some(x));
                    active.center_y = Set(Some(y));
                    active.coordinate_state = Set(CoordinateState::Ok);
                    report.updated += 1;
                }
                None => {
                    log::debug!("Postal code {} has malformed position '{}'", code, pos);
                    active.coordinate_state = Set(CoordinateState::WrongFormat);
                    report.wrong_format += 1;
                }
            },
        }
        active.modified = Set(Some(now));
        active.update(&txn).await?;
        report.processed += 1;
    }
    txn.commit().await?;
    Ok(())
}
