use widl_syntax::Keyword;

/// Reserved words, looked up once per identifier-shaped token. A `phf` map
/// compiles to a perfect hash, so this costs nothing over a `match` at
/// runtime but keeps the table data-driven.
static KEYWORDS: phf::Map<&'static str, Keyword> = phf::phf_map! {
    "library" => Keyword::Library,
    "using" => Keyword::Using,
    "as" => Keyword::As,
    "const" => Keyword::Const,
    "bits" => Keyword::Bits,
    "enum" => Keyword::Enum,
    "struct" => Keyword::Struct,
    "table" => Keyword::Table,
    "union" => Keyword::Union,
    "protocol" => Keyword::Protocol,
    "service" => Keyword::Service,
    "type" => Keyword::Type,
    "resource" => Keyword::Resource,
    "strict" => Keyword::Strict,
    "flexible" => Keyword::Flexible,
    "reserved" => Keyword::Reserved,
    "compose" => Keyword::Compose,
    "true" => Keyword::True,
    "false" => Keyword::False,
};

pub fn lookup(text: &str) -> Option<Keyword> {
    KEYWORDS.get(text).copied()
}
