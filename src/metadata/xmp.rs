//! Component J: XMP packet recognition and the UltraHDR gain-map extractor
//! layered on top of it.
//!
//! No regex dependency here - the teacher's own parsing throughout
//! `headers.rs` is all hand-rolled byte/string scanning, and the field
//! grammar is simple enough (`hdrgm:Field="..."` or a three-`<rdf:li>`
//! sequence) that a small scanner reads better than a five-line regex
//! nobody wants to debug against whitespace variants.

use crate::errors::DecodeErrors;

/// A recognised XMP packet: raw bytes (primary packet plus any extension
/// segments concatenated on, see [`crate::headers`]) and the namespace
/// prefixes it declares.
#[derive(Debug, Clone, Default)]
pub struct XmpPacket
{
    pub raw: Vec<u8>,
    pub namespaces: Vec<String>
}

/// The nine UltraHDR gain-map fields, each either a single value (one gain
/// map shared across channels) or three (per R/G/B channel).
#[derive(Debug, Clone, Default)]
pub struct UltraHdrInfo
{
    pub version: Vec<f64>,
    pub gain_map_min: Vec<f64>,
    pub gain_map_max: Vec<f64>,
    pub gamma: Vec<f64>,
    pub offset_sdr: Vec<f64>,
    pub offset_hdr: Vec<f64>,
    pub hdr_capacity_min: Vec<f64>,
    pub hdr_capacity_max: Vec<f64>,
    pub base_rendition_is_hdr: bool
}

/// Recognise an XMP packet and list the namespace prefixes it declares
/// (`xmlns:<prefix>=`), without attempting to understand any of them.
pub fn parse_xmp_packet(raw: Vec<u8>) -> XmpPacket
{
    let text = String::from_utf8_lossy(&raw);
    let mut namespaces = Vec::new();

    let mut rest = text.as_ref();
    while let Some(pos) = rest.find("xmlns:")
    {
        rest = &rest[pos + "xmlns:".len()..];
        if let Some(eq) = rest.find('=')
        {
            let prefix = rest[..eq].trim();
            if !prefix.is_empty() && !namespaces.iter().any(|n: &String| n == prefix)
            {
                namespaces.push(prefix.to_string());
            }
            rest = &rest[eq..];
        }
        else
        {
            break;
        }
    }

    XmpPacket { raw, namespaces }
}

/// Try to extract an UltraHDR gain-map report from an XMP packet's text.
/// Returns `Ok(None)` when a required field is simply absent (this isn't an
/// UltraHDR packet); `Err` when a field is present but malformed, or both
/// the scalar and RDF-sequence forms of the same field are present.
pub fn parse_ultra_hdr(text: &str) -> Result<Option<UltraHdrInfo>, DecodeErrors>
{
    let version = match field(text, "Version", true, None)?
    {
        Some(v) => v,
        None => return Ok(None)
    };
    let gain_map_min = field(text, "GainMapMin", false, Some(0.0))?.unwrap();
    let gain_map_max = match field(text, "GainMapMax", true, None)?
    {
        Some(v) => v,
        None => return Ok(None)
    };
    let gamma = field(text, "Gamma", false, Some(1.0))?.unwrap();
    let offset_sdr = field(text, "OffsetSDR", false, Some(1.0 / 64.0))?.unwrap();
    let offset_hdr = field(text, "OffsetHDR", false, Some(1.0 / 64.0))?.unwrap();
    let hdr_capacity_min = field(text, "HDRCapacityMin", false, Some(0.0))?.unwrap();
    let hdr_capacity_max = match field(text, "HDRCapacityMax", true, None)?
    {
        Some(v) => v,
        None => return Ok(None)
    };

    let base_rendition_is_hdr = text.contains("hdrgm:BaseRenditionIsHDR=\"True\"");

    Ok(Some(UltraHdrInfo {
        version,
        gain_map_min,
        gain_map_max,
        gamma,
        offset_sdr,
        offset_hdr,
        hdr_capacity_min,
        hdr_capacity_max,
        base_rendition_is_hdr
    }))
}

/// Extract one gain-map field, trying both the scalar and RDF-sequence
/// forms. A field present in both forms is rejected as malformed.
fn field(
    text: &str, name: &str, required: bool, default: Option<f64>
) -> Result<Option<Vec<f64>>, DecodeErrors>
{
    let scalar = find_scalar(text, name);
    let sequence = find_rdf_sequence(text, name)?;

    match (scalar, sequence)
    {
        (Some(_), Some(_)) => Err(DecodeErrors::UltraHdrMalformed(format!(
            "field {} present in both scalar and RDF-sequence form",
            name
        ))),
        (Some(v), None) => Ok(Some(vec![v])),
        (None, Some(v)) => Ok(Some(v)),
        (None, None) if required => Ok(None),
        (None, None) => Ok(default.map(|d| vec![d]))
    }
}

/// `hdrgm:Field="<signed decimal>"`.
fn find_scalar(text: &str, name: &str) -> Option<f64>
{
    let needle = format!("hdrgm:{}=\"", name);
    let start = text.find(&needle)? + needle.len();
    let rest = &text[start..];
    let end = rest.find('"')?;
    rest[..end].parse::<f64>().ok()
}

/// `<hdrgm:Field> <rdf:Seq> <rdf:li>v1</rdf:li><rdf:li>v2</rdf:li>
/// <rdf:li>v3</rdf:li> </rdf:Seq> </hdrgm:Field>`, whitespace-tolerant.
fn find_rdf_sequence(text: &str, name: &str) -> Result<Option<Vec<f64>>, DecodeErrors>
{
    let open = format!("<hdrgm:{}>", name);
    let close = format!("</hdrgm:{}>", name);

    let Some(open_pos) = text.find(&open) else { return Ok(None) };
    let after_open = &text[open_pos + open.len()..];

    let Some(close_pos) = after_open.find(&close) else { return Ok(None) };
    let body = &after_open[..close_pos];

    if !body.contains("<rdf:Seq>") || !body.contains("</rdf:Seq>")
    {
        return Ok(None);
    }

    let mut values = Vec::with_capacity(3);
    let mut rest = body;
    while let Some(li_start) = rest.find("<rdf:li>")
    {
        rest = &rest[li_start + "<rdf:li>".len()..];
        let Some(li_end) = rest.find("</rdf:li>") else { break };
        let raw = rest[..li_end].trim();
        let value = raw.parse::<f64>().map_err(|_| {
            DecodeErrors::UltraHdrMalformed(format!(
                "field {} has a non-numeric <rdf:li> entry: {:?}",
                name, raw
            ))
        })?;
        values.push(value);
        rest = &rest[li_end + "</rdf:li>".len()..];
    }

    if values.len() != 3
    {
        return Err(DecodeErrors::UltraHdrMalformed(format!(
            "field {} RDF sequence has {} entries, expected 3",
            name,
            values.len()
        )));
    }

    Ok(Some(values))
}

#[cfg(test)]
mod tests
{
    use super::*;

    const SCALAR_GAIN_MAP: &str = r#"
        <rdf:Description
         xmlns:hdrgm="http://ns.adobe.com/hdr-gain-map/1.0/"
         hdrgm:Version="1.0"
         hdrgm:GainMapMin="-0.57609993"
         hdrgm:GainMapMax="4.7090998"
         hdrgm:Gamma="1"
         hdrgm:OffsetSDR="0.015625"
         hdrgm:OffsetHDR="0.015625"
         hdrgm:HDRCapacityMin="0"
         hdrgm:HDRCapacityMax="4.7090998"
         hdrgm:BaseRenditionIsHDR="False"/>
    "#;

    #[test]
    fn scalar_form_parses_all_required_and_optional_fields()
    {
        let info = parse_ultra_hdr(SCALAR_GAIN_MAP).unwrap().unwrap();
        assert_eq!(info.version, vec![1.0]);
        assert_eq!(info.gain_map_max, vec![4.7090998]);
        assert_eq!(info.gamma, vec![1.0]);
        assert!(!info.base_rendition_is_hdr);
    }

    #[test]
    fn missing_required_field_means_not_ultra_hdr()
    {
        let text = r#"hdrgm:Version="1.0" hdrgm:GainMapMax="1.0""#;
        assert!(parse_ultra_hdr(text).unwrap().is_none());
    }

    #[test]
    fn rdf_sequence_triple_parses()
    {
        let text = r#"
            hdrgm:Version="1.0"
            <hdrgm:GainMapMax>
                <rdf:Seq>
                    <rdf:li>-0.078</rdf:li>
                    <rdf:li>-0.049</rdf:li>
                    <rdf:li>-0.028</rdf:li>
                </rdf:Seq>
            </hdrgm:GainMapMax>
            hdrgm:HDRCapacityMax="1.0"
        "#;
        let info = parse_ultra_hdr(text).unwrap().unwrap();
        assert_eq!(info.gain_map_max, vec![-0.078, -0.049, -0.028]);
    }

    #[test]
    fn both_forms_present_is_malformed()
    {
        let text = r#"
            hdrgm:Version="1.0"
            hdrgm:GainMapMax="1.0"
            <hdrgm:GainMapMax>
                <rdf:Seq>
                    <rdf:li>1</rdf:li><rdf:li>2</rdf:li><rdf:li>3</rdf:li>
                </rdf:Seq>
            </hdrgm:GainMapMax>
            hdrgm:HDRCapacityMax="1.0"
        "#;
        assert!(parse_ultra_hdr(text).is_err());
    }

    #[test]
    fn namespace_list_is_detected_and_deduplicated()
    {
        let raw = br#"<x:xmpmeta xmlns:x="adobe:ns:meta/"><rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"/></x:xmpmeta>"#.to_vec();
        let packet = parse_xmp_packet(raw);
        assert_eq!(packet.namespaces, vec!["x".to_string(), "rdf".to_string()]);
    }
}
