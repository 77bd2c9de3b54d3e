use std::sync::Arc;

use actix_cors::Cors;
use actix_web::error::JsonPayloadError;
use actix_web::http::header;
use actix_web::{
    App, HttpRequest, HttpResponse, HttpServer, Responder, get, middleware::Logger, post, web,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::extract::{self, describe_failure};
use crate::ratelimit::{Admission, RateLimiter, UNKNOWN_CLIENT};
use crate::youtube::Extractor;
use crate::{RequestOptions, VideoSummary, validate};

const JSON_LIMIT: usize = 64 * 1024;
const INVALID_BODY: &str = "Invalid request body";

pub struct AppState {
    pub extractor: Arc<dyn Extractor>,
    pub limiter: RateLimiter,
}

impl AppState {
    pub fn new(extractor: Arc<dyn Extractor>, limiter: RateLimiter) -> Self {
        Self { extractor, limiter }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    pub video_id: Option<String>,
    pub options: Option<RequestOptions>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistRequest {
    pub playlist_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRequest {
    pub channel_url: Option<String>,
    /// Any JSON number; clamped later rather than rejected
    pub max_videos: Option<serde_json::Number>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub success: bool,
    pub transcript: String,
    pub word_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResponse {
    pub success: bool,
    pub videos: Vec<VideoSummary>,
    pub playlist_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResponse {
    pub success: bool,
    pub videos: Vec<VideoSummary>,
    pub channel_name: String,
}

#[get("/health")]
pub async fn health_check() -> impl Responder {
    debug!("Health check endpoint called");
    HttpResponse::Ok().json(serde_json::json!({ "status": "healthy" }))
}

#[get("/")]
pub async fn service_info() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "ytscribe API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "extract": "/api/extract",
            "playlist": "/api/playlist/videos",
            "channel": "/api/channel/videos"
        }
    }))
}

#[post("/api/extract")]
pub async fn extract_transcript(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<ExtractRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let raw_id = required(body.video_id, "videoId is required")?;
    let video_id = validate::normalize_video_id(&raw_id)
        .ok_or_else(|| ApiError::validation("Invalid YouTube video ID"))?;
    let options = body.options.unwrap_or_default();

    admit(&data.limiter, &req)?;

    info!(
        "Transcript extraction request: video={video_id}, format={}, timestamps={}",
        options.format, options.include_timestamps
    );

    let transcript = extract::extract_transcript(data.extractor.as_ref(), &video_id, options)
        .await
        .map_err(|e| ApiError::extraction(describe_failure(&e, "Error extracting transcript")))?;

    Ok(HttpResponse::Ok().json(ExtractResponse {
        success: true,
        transcript: transcript.transcript,
        word_count: transcript.word_count,
    }))
}

#[post("/api/playlist/videos")]
pub async fn playlist_videos(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<PlaylistRequest>,
) -> ApiResult<HttpResponse> {
    let url = required_youtube_url(body.into_inner().playlist_url, "Playlist URL is required")?;

    admit(&data.limiter, &req)?;

    info!("Playlist listing request: {url}");

    let listing = extract::list_playlist(data.extractor.as_ref(), &url)
        .await
        .map_err(|e| {
            ApiError::extraction(describe_failure(&e, "Failed to extract playlist videos"))
        })?;

    Ok(HttpResponse::Ok().json(PlaylistResponse {
        success: true,
        videos: listing.videos,
        playlist_name: listing.name,
    }))
}

#[post("/api/channel/videos")]
pub async fn channel_videos(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<ChannelRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let url = required_youtube_url(body.channel_url, "Channel URL is required")?;

    admit(&data.limiter, &req)?;

    info!("Channel listing request: {url}, maxVideos={:?}", body.max_videos);

    let max_videos = body.max_videos.as_ref().and_then(serde_json::Number::as_f64);
    let listing = extract::list_channel(data.extractor.as_ref(), &url, max_videos)
        .await
        .map_err(|e| {
            ApiError::extraction(describe_failure(&e, "Failed to extract channel videos"))
        })?;

    Ok(HttpResponse::Ok().json(ChannelResponse {
        success: true,
        videos: listing.videos,
        channel_name: listing.name,
    }))
}

fn required(value: Option<String>, missing: &str) -> ApiResult<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => {
            warn!("Rejected request: {missing}");
            Err(ApiError::validation(missing))
        }
    }
}

fn required_youtube_url(value: Option<String>, missing: &str) -> ApiResult<String> {
    let url = required(value, missing)?;
    if !validate::is_allowed_url(&url) {
        warn!("Rejected non-YouTube URL: {url}");
        return Err(ApiError::validation("Invalid URL. Only YouTube URLs are allowed"));
    }
    Ok(url)
}

fn client_id(req: &HttpRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn admit(limiter: &RateLimiter, req: &HttpRequest) -> ApiResult<()> {
    let client = client_id(req);
    match limiter.check(&client) {
        Admission::Allowed => Ok(()),
        Admission::Rejected => {
            warn!("Rate limit exceeded for {client}");
            Err(ApiError::RateLimited)
        }
    }
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected malformed JSON body: {err}");
    ApiError::validation(INVALID_BODY).into()
}

/// Routes and body limits shared by the server and tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT)
            .error_handler(json_error_handler),
    )
    .service(health_check)
    .service(service_info)
    .service(extract_transcript)
    .service(playlist_videos)
    .service(channel_videos);
}

pub fn cors(allowed_origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(allowed_origin)
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600)
}

pub async fn run_server(
    host: String,
    port: u16,
    allowed_origin: String,
    extractor: Arc<dyn Extractor>,
    limiter: RateLimiter,
) -> std::io::Result<()> {
    info!(
        "Rate limit: {} requests per {}s per client",
        limiter.max_requests(),
        limiter.window().as_secs()
    );
    info!("Allowed CORS origin: {allowed_origin}");

    let app_state = web::Data::new(AppState::new(extractor, limiter));

    info!("Starting HTTP server on {host}:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(cors(&allowed_origin))
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
