use crate::config::{Config, ERROR_PAGE, INDEX_PAGE, MESSAGE_PAGE};
use crate::data_sender::DataSender;
use crate::data_types::{Envelope, Submission};
use actix_files::file_extension_to_mime;
use actix_web::http::header::{self, ContentType};
use actix_web::http::StatusCode;
use actix_web::{get, post, web, App, HttpRequest, HttpResponse, HttpServer, ResponseError};
use std::fmt::Display;
use std::path::{Component, Path, PathBuf};

/// Files the handlers read, resolved against the site root.
#[derive(Debug, Clone)]
pub struct Site {
    root: PathBuf,
    index: PathBuf,
    message: PathBuf,
    error: PathBuf,
}

impl Site {
    pub fn new(config: &Config) -> Self {
        Self {
            root: config.root.clone(),
            index: config.page(INDEX_PAGE),
            message: config.page(MESSAGE_PAGE),
            error: config.page(ERROR_PAGE),
        }
    }

    /// Maps a decoded request path onto a file under the root. Anything that
    /// would leave the root yields `None`.
    fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let mut path = self.root.clone();
        for component in Path::new(request_path).components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        path.is_file().then_some(path)
    }
}

#[derive(Debug)]
pub enum SubmitError {
    MissingLength,
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::MissingLength => f.write_str("request has no Content-Length"),
        }
    }
}

impl ResponseError for SubmitError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubmitError::MissingLength => StatusCode::LENGTH_REQUIRED,
        }
    }
}

async fn html_page(path: &Path, status: StatusCode) -> actix_web::Result<HttpResponse> {
    let body = tokio::fs::read(path).await.map_err(|e| {
        log::error!("Cannot read page {}: {}", path.display(), e);
        actix_web::error::ErrorInternalServerError(e)
    })?;
    Ok(HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body))
}

/// Guesses from the extension; unknown types are served as plain text.
fn content_type_for(path: &Path) -> ContentType {
    let guessed = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(file_extension_to_mime);
    match guessed {
        Some(mime) if mime != ContentType::octet_stream().0 => ContentType(mime),
        _ => ContentType::plaintext(),
    }
}

#[get("/")]
async fn index(site: web::Data<Site>) -> actix_web::Result<HttpResponse> {
    html_page(&site.index, StatusCode::OK).await
}

#[get("/message")]
async fn message_form(site: web::Data<Site>) -> actix_web::Result<HttpResponse> {
    html_page(&site.message, StatusCode::OK).await
}

#[post("/message")]
async fn submit(
    req: HttpRequest,
    body: web::Bytes,
    sender: web::Data<DataSender>,
) -> Result<HttpResponse, SubmitError> {
    if !req.headers().contains_key(header::CONTENT_LENGTH) {
        return Err(SubmitError::MissingLength);
    }
    let form = String::from_utf8_lossy(&body);
    log::info!("Received POST data: {}", form);

    // The query-string parser gives the same pair decoding as a form body.
    let pairs = web::Query::<Vec<(String, String)>>::from_query(&form)
        .map(web::Query::into_inner)
        .unwrap_or_default();
    let envelope = Envelope::now(Submission::from_pairs(pairs));

    if let Err(e) = sender.send(&envelope).await {
        log::error!("Error sending data via UDP to {}: {}", sender.target(), e);
    }

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .finish())
}

/// Always the whole file with 200: no validators, no ranges.
#[get("/{path:.*}")]
async fn static_file(path: web::Path<String>, site: web::Data<Site>) -> actix_web::Result<HttpResponse> {
    let file = match site.resolve(&path) {
        Some(file) => file,
        None => return html_page(&site.error, StatusCode::NOT_FOUND).await,
    };
    let body = tokio::fs::read(&file).await?;
    Ok(HttpResponse::Ok().content_type(content_type_for(&file)).body(body))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().finish()
}

/// Registers every route; the order matters since `static_file` matches any GET.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(message_form)
        .service(submit)
        .service(static_file)
        .default_service(web::to(not_found));
}

pub struct WebServer {
    config: Config,
    sender: web::Data<DataSender>,
}

impl WebServer {
    pub fn new(config: Config, sender: DataSender) -> Self {
        Self {
            config,
            sender: web::Data::new(sender),
        }
    }

    pub async fn start(&self) -> crate::error::Result<()> {
        let site = web::Data::new(Site::new(&self.config));
        let sender = self.sender.clone();

        log::info!("Starting web server on {}", self.config.http_addr);

        HttpServer::new(move || {
            App::new()
                .app_data(site.clone())
                .app_data(sender.clone())
                .configure(routes)
        })
        .workers(1)
        .disable_signals()
        .bind(self.config.http_addr)?
        .run()
        .await?;

        Ok(())
    }
}
