//! File extension to MIME type lookup.
//!
//! Responses select their content type by a short key (`"json"`, `"xml"`,
//! `"html"`, ...), and views pick resource tags by file extension; both go
//! through [`from_extension`].

/// The MIME type used when a key is unknown.
pub const DEFAULT_MIME: &str = "text/html";

/// Returns the MIME type registered for a file extension.
///
/// The lookup is case-insensitive and ignores a leading dot.
///
/// # Examples
///
/// ```
/// use cross_rs_http::mime::from_extension;
///
/// assert_eq!(from_extension("json"), Some("application/json"));
/// assert_eq!(from_extension(".CSS"), Some("text/css"));
/// assert_eq!(from_extension("unknown"), None);
/// ```
pub fn from_extension(ext: &str) -> Option<&'static str> {
    let ext = ext.trim_start_matches('.').to_ascii_lowercase();
    let mime = match ext.as_str() {
        // application
        "ez" => "application/andrew-inset",
        "hqx" => "application/mac-binhex40",
        "cpt" => "application/mac-compactpro",
        "doc" => "application/msword",
        "bin" | "dms" | "lha" | "lzh" | "exe" | "class" | "so" | "dll" => {
            "application/octet-stream"
        }
        "oda" => "application/oda",
        "pdf" => "application/pdf",
        "ai" | "eps" | "ps" => "application/postscript",
        "smi" | "smil" => "application/smil",
        "mif" => "application/vnd.mif",
        "xls" => "application/vnd.ms-excel",
        "ppt" => "application/vnd.ms-powerpoint",
        "wbxml" => "application/vnd.wap.wbxml",
        "wmlc" => "application/vnd.wap.wmlc",
        "wmlsc" => "application/vnd.wap.wmlscriptc",
        "bcpio" => "application/x-bcpio",
        "vcd" => "application/x-cdlink",
        "pgn" => "application/x-chess-pgn",
        "cpio" => "application/x-cpio",
        "csh" => "application/x-csh",
        "dcr" | "dir" | "dxr" => "application/x-director",
        "dvi" => "application/x-dvi",
        "spl" => "application/x-futuresplash",
        "gtar" => "application/x-gtar",
        "hdf" => "application/x-hdf",
        "js" => "application/x-javascript",
        "json" => "application/json",
        "skp" | "skd" | "skt" | "skm" => "application/x-koan",
        "latex" => "application/x-latex",
        "nc" | "cdf" => "application/x-netcdf",
        "sh" => "application/x-sh",
        "shar" => "application/x-shar",
        "swf" => "application/x-shockwave-flash",
        "sit" => "application/x-stuffit",
        "sv4cpio" => "application/x-sv4cpio",
        "sv4crc" => "application/x-sv4crc",
        "tar" => "application/x-tar",
        "tcl" => "application/x-tcl",
        "tex" => "application/x-tex",
        "texinfo" | "texi" => "application/x-texinfo",
        "t" | "tr" | "roff" => "application/x-troff",
        "man" => "application/x-troff-man",
        "me" => "application/x-troff-me",
        "ms" => "application/x-troff-ms",
        "ustar" => "application/x-ustar",
        "src" => "application/x-wais-source",
        "xhtml" | "xht" => "application/xhtml+xml",
        "zip" => "application/zip",
        // audio
        "au" | "snd" => "audio/basic",
        "mid" | "midi" | "kar" => "audio/midi",
        "mpga" | "mp2" | "mp3" => "audio/mpeg",
        "aif" | "aiff" | "aifc" => "audio/x-aiff",
        "m3u" => "audio/x-mpegurl",
        "ram" | "rm" => "audio/x-pn-realaudio",
        "rpm" => "audio/x-pn-realaudio-plugin",
        "ra" => "audio/x-realaudio",
        "wav" => "audio/x-wav",
        // chemical
        "pdb" => "chemical/x-pdb",
        "xyz" => "chemical/x-xyz",
        // image
        "bmp" => "image/bmp",
        "gif" => "image/gif",
        "ief" => "image/ief",
        "jpeg" | "jpg" | "jpe" => "image/jpeg",
        "png" => "image/png",
        "tiff" | "tif" => "image/tiff",
        "djvu" | "djv" => "image/vnd.djvu",
        "wbmp" => "image/vnd.wap.wbmp",
        "ras" => "image/x-cmu-raster",
        "pnm" => "image/x-portable-anymap",
        "pbm" => "image/x-portable-bitmap",
        "pgm" => "image/x-portable-graymap",
        "ppm" => "image/x-portable-pixmap",
        "rgb" => "image/x-rgb",
        "xbm" => "image/x-xbitmap",
        "xpm" => "image/x-xpixmap",
        "xwd" => "image/x-xwindowdump",
        // model
        "igs" | "iges" => "model/iges",
        "msh" | "mesh" | "silo" => "model/mesh",
        "wrl" | "vrml" => "model/vrml",
        // text
        "css" => "text/css",
        "html" | "htm" => "text/html",
        "asc" | "txt" => "text/plain",
        "rtx" => "text/richtext",
        "rtf" => "text/rtf",
        "sgml" | "sgm" => "text/sgml",
        "tsv" => "text/tab-separated-values",
        "wml" => "text/vnd.wap.wml",
        "wmls" => "text/vnd.wap.wmlscript",
        "etx" => "text/x-setext",
        "xsl" | "xml" => "text/xml",
        // video
        "mpeg" | "mpg" | "mpe" => "video/mpeg",
        "qt" | "mov" => "video/quicktime",
        "mxu" => "video/vnd.mpegurl",
        "avi" => "video/x-msvideo",
        "movie" => "video/x-sgi-movie",
        "ice" => "x-conference/x-cooltalk",
        _ => return None,
    };
    Some(mime)
}

/// Returns the MIME type for a key, falling back to [`DEFAULT_MIME`].
pub fn from_extension_or_default(ext: &str) -> &'static str {
    from_extension(ext).unwrap_or(DEFAULT_MIME)
}

/// Returns the extension of a path or URL (text after the last `.` of the
/// last path segment, ignoring any query string).
pub fn extension_of(path: &str) -> Option<&str> {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let file = path.rsplit('/').next().unwrap_or(path);
    file.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(from_extension("xml"), Some("text/xml"));
        assert_eq!(from_extension("html"), Some("text/html"));
        assert_eq!(from_extension("js"), Some("application/x-javascript"));
        assert_eq!(from_extension("jpg"), Some("image/jpeg"));
        assert_eq!(from_extension("mp3"), Some("audio/mpeg"));
    }

    #[test]
    fn test_case_and_dot_insensitive() {
        assert_eq!(from_extension("PNG"), Some("image/png"));
        assert_eq!(from_extension(".json"), Some("application/json"));
    }

    #[test]
    fn test_unknown_falls_back() {
        assert_eq!(from_extension("nope"), None);
        assert_eq!(from_extension_or_default("nope"), DEFAULT_MIME);
        assert_eq!(from_extension_or_default("json"), "application/json");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("css/site.min.css"), Some("css"));
        assert_eq!(extension_of("/js/app.js?v=3"), Some("js"));
        assert_eq!(extension_of("http://cdn.example.com/lib/jquery"), None);
        assert_eq!(extension_of("dir.v2/readme"), None);
        assert_eq!(extension_of("trailing."), None);
    }
}
