//! Plot URL construction.
//!
//! The rendering backend reads its parameters from a single query argument.
//! Some layers between the page and the backend mangle the sub-delimiters a
//! plain `encodeURIComponent` leaves alone, so the encoding here is stricter:
//! only `A-Z a-z 0-9 - _ . ~` pass through literally.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::Result;

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Bytes `encodeURIComponent` leaves untouched but the backend needs escaped.
const EXTRA_ESCAPED: &[u8] = b"!'()*";

fn is_component_safe(b: u8) -> bool {
	b.is_ascii_alphanumeric()
		|| matches!(
			b,
			b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')'
		)
}

fn push_escaped(out: &mut String, b: u8) {
	out.push('%');
	out.push(HEX[(b >> 4) as usize] as char);
	out.push(HEX[(b & 0x0f) as usize] as char);
}

/// Percent-encode `input` like `encodeURIComponent`, then also escape
/// `!`, `'`, `(`, `)` and `*`.
pub fn encode_component(input: &str) -> String {
	let mut out = String::with_capacity(input.len() * 3);
	for &b in input.as_bytes() {
		if is_component_safe(b) && !EXTRA_ESCAPED.contains(&b) {
			out.push(b as char);
		} else {
			push_escaped(&mut out, b);
		}
	}
	out
}

fn default_path() -> String {
	"plot/".to_string()
}

fn default_query_key() -> String {
	"params".to_string()
}

/// Location of the rendering backend that turns parameters into an image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotEndpoint {
	/// Path requested by the image element, relative to the page.
	#[serde(default = "default_path")]
	pub path: String,
	/// Name of the query argument carrying the encoded parameters.
	#[serde(default = "default_query_key")]
	pub query_key: String,
}

impl Default for PlotEndpoint {
	fn default() -> Self {
		Self {
			path: default_path(),
			query_key: default_query_key(),
		}
	}
}

impl PlotEndpoint {
	/// Image source for an already-serialized parameter value.
	pub fn src_for(&self, params: &Value) -> String {
		// `Value`'s Display writes compact JSON and cannot fail.
		let json = params.to_string();
		format!("{}?{}={}", self.path, self.query_key, encode_component(&json))
	}

	/// Image source for arbitrary caller data.
	pub fn src_for_params<P: Serialize + ?Sized>(&self, params: &P) -> Result<String> {
		let json = serde_json::to_string(params)?;
		Ok(format!(
			"{}?{}={}",
			self.path,
			self.query_key,
			encode_component(&json)
		))
	}
}
