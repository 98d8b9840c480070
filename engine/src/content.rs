use std::collections::HashMap;

pub fn builtin_foes() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("orc", include_str!("../content/foes/orc.yaml")),
        ("ogre", include_str!("../content/foes/ogre.yaml")),
        ("wild_dog", include_str!("../content/foes/wild_dog.yaml")),
    ])
}
