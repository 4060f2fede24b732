use http::header::{COOKIE, REFERER, SET_COOKIE};
use http::Request;
use referer_cookie::cookies::HeaderCookieStore;
use referer_cookie::{RefererCookieConfig, RefererError, RefererTracker, RequestContext};

// Simulates a visitor arriving from a search engine, then browsing internally.
fn main() -> Result<(), RefererError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let config = RefererCookieConfig::from_json_str(
        r#"{
            "name": "referer",
            "lifetime": 86400,
            "httponly": true,
            "track_internal_referer": true,
            "internal_domains": ["example.com", "*.example.com"]
        }"#,
    )?;

    // The browser sends back whatever we set on the previous response.
    let mut cookie_header: Option<String> = None;

    for referer in ["https://www.search.test/?q=shoes", "https://shop.example.com/cart"] {
        let mut builder = Request::builder().uri("/landing").header(REFERER, referer);
        if let Some(c) = &cookie_header {
            builder = builder.header(COOKIE, c.as_str());
        }
        let (parts, _) = builder.body(()).expect("static request is valid").into_parts();

        let store = HeaderCookieStore::from_request(&parts.headers);
        let mut tracker = RefererTracker::new(config.clone(), store, RequestContext::from_parts(&parts))?;
        tracker.on_request();

        println!("referer: {referer}");
        println!("  get()         = {:?}", tracker.get(None)?);
        println!("  get(internal) = {:?}", tracker.internal()?);
        println!("  get(external) = {:?}", tracker.external()?);

        let response = tracker.into_store().into_response_headers();
        for set_cookie in response.get_all(SET_COOKIE) {
            let header = set_cookie.to_str().unwrap_or_default();
            println!("  Set-Cookie: {header}");
            if let Some(pair) = header.split(';').next() {
                cookie_header = Some(pair.to_string());
            }
        }
    }

    Ok(())
}
