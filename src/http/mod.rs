// ==========================================
// 商品目录服务 - HTTP 层
// ==========================================
// 框架: actix-web
// 路由:
// - GET /products?page=&page_size=   分页列表
// - GET /products/summary            汇总统计（必须先于 /products/{id} 注册）
// - GET /products/{id}               按 id 查询，不存在时 404
// - GET /healthz                     健康检查
// 说明: 仓储是同步 rusqlite 调用，统一放进 web::block 执行
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::app::AppState;
use actix_web::middleware::Logger;
use actix_web::{dev::Server, get, web, App, HttpResponse, HttpServer};
use serde::{Deserialize, Serialize};
use tracing::info;

/// 列表查询参数（保持原始字符串，非数字时按缺省处理）
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

fn parse_param(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
}

/// 在阻塞线程池执行同步调用
async fn run_blocking<F, T>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| ApiError::InternalError(e.to_string()))?
}

#[get("/products")]
async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let page = parse_param(query.page.as_deref());
    let page_size = parse_param(query.page_size.as_deref());
    let api = state.product_api.clone();

    let result = run_blocking(move || api.list_products(page, page_size)).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/products/summary")]
async fn product_summary(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let api = state.product_api.clone();
    let summary = run_blocking(move || api.get_summary()).await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[get("/products/{id}")]
async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let api = state.product_api.clone();
    let product = run_blocking(move || api.get_product(&id)).await?;
    Ok(HttpResponse::Ok().json(product))
}

#[get("/healthz")]
async fn healthz() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// 注册全部路由
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_products)
        .service(product_summary)
        .service(get_product)
        .service(healthz);
}

/// 创建 HTTP 服务（调用方负责 await）
pub fn start_server(state: web::Data<AppState>, host: &str, port: u16) -> std::io::Result<Server> {
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run();

    info!(host = %host, port, "HTTP 服务已绑定");
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param_is_lenient() {
        assert_eq!(parse_param(Some("3")), Some(3));
        assert_eq!(parse_param(Some(" 7 ")), Some(7));
        assert_eq!(parse_param(Some("abc")), None);
        assert_eq!(parse_param(Some("")), None);
        assert_eq!(parse_param(None), None);
    }
}
