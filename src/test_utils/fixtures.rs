//! GeoWebCache status page fixtures.
//!
//! The layout follows the real home page: a welcome heading, a `<th>`/`<td>` runtime
//! table, the rolling window rows and, optionally, the in-memory cache table which
//! uses `<td>` cells for its labels.

const HEADER: &str = r#"<html>
<head><title>GWC Home</title></head>
<body>
<div id="pageHeader">
<h3>Welcome to GeoWebCache version 1.25.2, build 2024-09-12T10:11:12Z</h3>
</div>
<h4>Runtime Statistics</h4>
<table border="0" cellspacing="5">
<tr><th colspan="2" scope="row">Started:</th><td colspan="3">Wed, 7 Oct 2026 08:30:00 GMT (12 days)</td></tr>
<tr><th colspan="2" scope="row">Total number of requests:</th><td colspan="3">1,234,567 (1.19 /s)</td></tr>
<tr><th colspan="2" scope="row">Total number of untiled WMS requests:</th><td colspan="3">4,321 (0.0 /s)</td></tr>
<tr><th colspan="2" scope="row">Total number of bytes:</th><td colspan="3">98,765,432,100 (0.76 mbps)</td></tr>
<tr><td colspan="5"> </td></tr>
<tr><th colspan="2" scope="row">Cache hit ratio:</th><td colspan="3">87.5% of requests</td></tr>
<tr><th colspan="2" scope="row">Blank/KML/HTML:</th><td colspan="3">2.25% of requests</td></tr>
<tr><td colspan="5"> </td></tr>
<tr><th colspan="2" scope="row">Peak request rate:</th><td colspan="3">250.0 /s (Mon, 19 Oct 2026 11:45:10 GMT)</td></tr>
<tr><th colspan="2" scope="row">Peak bandwidth:</th><td colspan="3">48.2 mbps (Mon, 19 Oct 2026 11:45:10 GMT)</td></tr>
<tr><td colspan="5"> </td></tr>
<tr><th>Interval</th><th>Requests</th><th>Rate</th><th>Bytes</th><th>Bandwidth</th></tr>
<tr><td>3 seconds</td><td>9</td><td>3.0 /s</td><td>204,800</td><td>0.55 mbps</td></tr>
<tr><td>15 seconds</td><td>45</td><td>3.0 /s</td><td>1,048,576</td><td>0.56 mbps</td></tr>
<tr><td>60 seconds</td><td>180</td><td>3.0 /s</td><td>4,194,304</td><td>0.56 mbps</td></tr>
<tr><td colspan="5"> </td></tr>
</table>
<p>All figures are 3 second(s) delayed and do not include HTTP overhead</p>
<h4>Storage Locations</h4>
<table border="0" cellspacing="5">
<tr><th colspan="2" scope="row">Config file:</th><td colspan="3"><tt>/var/lib/geowebcache/geowebcache.xml</tt></td></tr>
<tr><th colspan="2" scope="row">Local Storage:</th><td colspan="3"><tt>/var/lib/geowebcache</tt></td></tr>
</table>
"#;

const MEMORY_CACHE: &str = r#"<h4>In Memory Cache Statistics</h4>
<table border="0" cellspacing="5" class="stats">
<tr><td>Total number of requests:</td><td>5,000</td></tr>
<tr><td>Internal Cache hit count:</td><td>4,000</td></tr>
<tr><td>Internal Cache miss count:</td><td>1,000</td></tr>
<tr><td>Internal Cache hit ratio:</td><td>80.0 %</td></tr>
<tr><td>Internal Cache miss ratio:</td><td>20.0 %</td></tr>
<tr><td>Total number of evicted tiles:</td><td>12</td></tr>
<tr><td>Cache Memory occupation:</td><td>4.88 %</td></tr>
<tr><td>Cache Actual Size/ Total Size :</td><td>12.5 / 256.0 Mb</td></tr>
</table>
"#;

const FOOTER: &str = "</body>\n</html>\n";

/// Older layout where the start time is plain text rather than a table cell.
pub const STATUS_PAGE_LOOSE_STARTED: &str =
    "<html><body><p>Started: Wed, 7 Oct 2026 08:30:00 GMT (2 hours)</p></body></html>";

/// A complete status page on which every known rule matches.
pub fn status_page() -> String {
    format!("{HEADER}{MEMORY_CACHE}{FOOTER}")
}

/// The same page as served when the in-memory blob store is disabled.
pub fn status_page_without_memory_cache() -> String {
    format!("{HEADER}{FOOTER}")
}
