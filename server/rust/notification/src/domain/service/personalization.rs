/// 通知本文の中で会員の呼び名に置き換えられる文字。
pub const NAME_PLACEHOLDER: char = '@';

/// 本文中のすべての `@` を呼び名で置き換える。
/// テンプレートエンジンではなく単一文字の単純置換で、エスケープの仕組みはない。
pub fn personalize(template: &str, display_name: &str) -> String {
    template.replace(NAME_PLACEHOLDER, display_name)
}
