use actix_cors::Cors;

pub fn create_cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|_, _req_head| {
            // 演示前端运行在任意开发地址，生产环境应限制允许的域名
            true
        })
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        // 前端通过自定义 `Token` Header 传递令牌，放宽以免预检失败
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}
