use url::Url;

/// Decorates a PDF result URL with the file endpoint's download hints.
///
/// `downloadAs` names the file on the client; `download` additionally asks for
/// an attachment so browsers save instead of display. `download` is only
/// honoured together with a name.
pub fn pdf_link(url: &Url, download_as: Option<&str>, force_download: bool) -> Url {
    let mut link = url.clone();
    if let Some(name) = download_as {
        let mut pairs = link.query_pairs_mut();
        pairs.append_pair("downloadAs", name);
        if force_download {
            pairs.append_pair("download", "");
        }
    }
    link
}
