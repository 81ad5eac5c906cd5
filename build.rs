use json::JsonValue;
use std::env;
use std::fmt::Write as FmtWrite;
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn main() {
    let mut tag_code = String::new();
    tag_code += &parse_tag_file("src/tags/ifd.json", "ifd");
    tag_code += &parse_tag_file("src/tags/exif.json", "exif");
    tag_code += &parse_tag_file("src/tags/gps_info.json", "gps_info");
    tag_code += &parse_tag_file("src/tags/iop.json", "iop");

    let out_dir = env::var("OUT_DIR").unwrap();
    let path = Path::new(&out_dir).join("tag_data.rs");
    let mut f = File::create(path).unwrap();
    f.write_all(tag_code.as_bytes()).unwrap();
}

fn parse_tag_file(path: &str, name: &str) -> String {
    println!("cargo:rerun-if-changed={path}");
    let contents = fs::read_to_string(path).expect("Unable to read file");
    let mut json: JsonValue = json::parse(&contents).expect("Unable to parse JSON");
    let entries: Vec<_> = json
        .members_mut()
        .map(|entry| parse_tag_descriptor(entry.take()))
        .collect();
    let definitions: String = entries.iter().map(|(_, code)| code.to_string()).collect();
    let arr_contents: String = entries.iter().fold(String::new(), |mut output, (name, _)| {
        let _ = write!(output, "{name}, ");
        output
    });
    let len = entries.len();
    format!(
        "
        /// Tags contained in the {name} table
        #[allow(non_upper_case_globals)]
        pub mod {name} {{
            #[allow(unused_imports)]
            use super::{{TagDescriptor, TagCount, TagInterpretation}};
            #[allow(unused_imports)]
            use crate::tag_type::TagType;
            pub const ALL: [TagDescriptor; {len}] = [{arr_contents}];
            {definitions}
        }}
    "
    )
}

fn parse_tag_descriptor(mut json: JsonValue) -> (String, String) {
    let name = json.remove("name").take_string().unwrap();
    let tag_string = json.remove("tag").take_string().unwrap();
    let tag = u16::from_str_radix(&tag_string[2..], 16).unwrap();
    let dtype = parse_dtype(json.remove("dtype"));
    let count = parse_count(json.remove("count"));
    let interpretation = parse_interpretation(json.remove("ifd_pointer"));
    let description = json.remove("description").take_string().unwrap();

    let code = format!(
        r#"
        TagDescriptor {{
            name: {name:?},
            tag: {tag},
            dtype: {dtype},
            count: {count},
            interpretation: {interpretation},
            description: {description:?},
        }}
    "#
    );
    let doc_description = doc_lines(description);
    let definition = format!(
        "
        {doc_description}
        ///
        /// tag: `{tag_string}`
        pub const {name}: TagDescriptor = {code};\n
    "
    );
    (name, definition)
}
fn doc_lines(lines: String) -> String {
    lines.lines().fold(String::new(), |mut out, s| {
        let _ = writeln!(out, "/// {s}");
        out
    })
}
fn parse_dtype(mut json: JsonValue) -> String {
    let entries: String = json
        .members_mut()
        .map(|entry| parse_single_dtype(entry.take()) + ", ")
        .collect();
    format!("&[{entries}]")
}
fn parse_single_dtype(json: JsonValue) -> String {
    match json.as_str().unwrap() {
        "BYTE" => "TagType::Byte".to_string(),
        "ASCII" => "TagType::Ascii".to_string(),
        "SHORT" => "TagType::Short".to_string(),
        "LONG" => "TagType::Long".to_string(),
        "RATIONAL" => "TagType::Rational".to_string(),
        "UNDEFINED" => "TagType::Undefined".to_string(),
        "SLONG" => "TagType::SignedLong".to_string(),
        "SRATIONAL" => "TagType::SignedRational".to_string(),
        other => panic!("unsupported dtype '{other}' in tag table"),
    }
}
fn parse_count(json: JsonValue) -> String {
    let str = json.as_str().unwrap_or("N");
    match str.parse::<u32>() {
        Ok(n) => format!("TagCount::ConcreteValue({n})"),
        Err(_) => "TagCount::N".to_string(),
    }
}
fn parse_interpretation(json: JsonValue) -> String {
    match json.as_str() {
        Some(child) => format!("TagInterpretation::IfdPointer {{ child: {child:?} }}"),
        None => "TagInterpretation::Default".to_string(),
    }
}
