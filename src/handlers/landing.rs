use axum::{extract::State, response::Html};
use std::sync::Arc;

/// Static landing page linking to the telemetry path
pub async fn landing_page(State(metrics_path): State<Arc<str>>) -> Html<String> {
    Html(render_landing_page(&metrics_path))
}

pub fn render_landing_page(metrics_path: &str) -> String {
    format!(
        r#"<html>
<head><title>Chronos Exporter</title></head>
<body>
<h1>Chronos Exporter</h1>
<p><a href='{}'>Metrics</a></p>
</body>
</html>
"#,
        metrics_path
    )
}
