//! Built-in executor tables

use indexmap::IndexMap;

pub(super) const TEMPORARY_FILE_NAME: &str = "tempCodeRunnerFile";

const EXECUTOR_MAP: &[(&str, &str)] = &[
    ("javascript", "node"),
    ("java", "cd $dir && javac $fileName && java $fileNameWithoutExt"),
    ("c", "cd $dir && gcc $fileName -o $fileNameWithoutExt && $dir$fileNameWithoutExt"),
    ("zig", "zig run"),
    ("cpp", "cd $dir && g++ $fileName -o $fileNameWithoutExt && $dir$fileNameWithoutExt"),
    (
        "objective-c",
        "cd $dir && gcc -framework Cocoa $fileName -o $fileNameWithoutExt && $dir$fileNameWithoutExt",
    ),
    ("php", "php"),
    ("python", "python -u"),
    ("perl", "perl"),
    ("perl6", "perl6"),
    ("ruby", "ruby"),
    ("go", "go run"),
    ("lua", "lua"),
    ("groovy", "groovy"),
    ("powershell", "powershell -ExecutionPolicy ByPass -File"),
    ("bat", "cmd /c"),
    ("shellscript", "bash"),
    ("fsharp", "fsi"),
    ("csharp", "scriptcs"),
    ("vbscript", "cscript //Nologo"),
    ("typescript", "ts-node"),
    ("coffeescript", "coffee"),
    ("scala", "scala"),
    ("swift", "swift"),
    ("julia", "julia"),
    ("crystal", "crystal"),
    ("ocaml", "ocaml"),
    ("r", "Rscript"),
    ("applescript", "osascript"),
    ("clojure", "lein exec"),
    ("haxe", "haxe --cwd $dirWithoutTrailingSlash --run $fileNameWithoutExt"),
    ("rust", "cd $dir && rustc $fileName && $dir$fileNameWithoutExt"),
    ("racket", "racket"),
    ("scheme", "csi -script"),
    ("ahk", "autohotkey"),
    ("autoit", "autoit3"),
    ("dart", "dart"),
    ("pascal", "cd $dir && fpc $fileName && $dir$fileNameWithoutExt"),
    ("d", "cd $dir && dmd $fileName && $dir$fileNameWithoutExt"),
    ("haskell", "runghc"),
    ("nim", "nim compile --verbosity:0 --hints:off --run"),
    ("lisp", "sbcl --script"),
    ("kit", "kitc --run"),
    ("v", "v run"),
    ("sass", "sass --style expanded"),
    ("scss", "scss --style expanded"),
    ("less", "cd $dir && lessc $fileName $fileNameWithoutExt.css"),
    (
        "FortranFreeForm",
        "cd $dir && gfortran $fileName -o $fileNameWithoutExt && $dir$fileNameWithoutExt",
    ),
    (
        "fortran",
        "cd $dir && gfortran $fileName -o $fileNameWithoutExt && $dir$fileNameWithoutExt",
    ),
];

const EXECUTOR_MAP_BY_FILE_EXTENSION: &[(&str, &str)] = &[
    (".vb", "cd $dir && vbc /nologo $fileName && $dir$fileNameWithoutExt"),
    (".scala", "scala"),
    (".jl", "julia"),
    (".cr", "crystal"),
    (".ml", "ocaml"),
    (".zig", "zig run"),
    (".exs", "elixir"),
    (".hx", "haxe --cwd $dirWithoutTrailingSlash --run $fileNameWithoutExt"),
    (".rkt", "racket"),
    (".scm", "csi -script"),
    (".ahk", "autohotkey"),
    (".au3", "autoit3"),
    (
        ".kt",
        "cd $dir && kotlinc $fileName -include-runtime -d $fileNameWithoutExt.jar && java -jar $fileNameWithoutExt.jar",
    ),
    (".kts", "kotlinc -script"),
    (".dart", "dart"),
    (".pas", "cd $dir && fpc $fileName && $dir$fileNameWithoutExt"),
    (".pp", "cd $dir && fpc $fileName && $dir$fileNameWithoutExt"),
    (".d", "cd $dir && dmd $fileName && $dir$fileNameWithoutExt"),
    (".hs", "runhaskell"),
    (".nim", "nim compile --verbosity:0 --hints:off --run"),
    (".csproj", "dotnet run --project"),
    (".fsproj", "dotnet run --project"),
    (".lisp", "sbcl --script"),
    (".kit", "kitc --run"),
    (".v", "v run"),
    (".vsh", "v run"),
    (".sass", "sass --style expanded"),
    (".cu", "cd $dir && nvcc $fileName -o $fileNameWithoutExt && $dir$fileNameWithoutExt"),
    (".ring", "ring"),
];

const EXECUTOR_MAP_BY_GLOB: &[(&str, &str)] = &[("pom.xml", "cd $dir && mvn clean package")];

const LANGUAGE_ID_TO_FILE_EXTENSION: &[(&str, &str)] = &[
    ("bat", ".bat"),
    ("powershell", ".ps1"),
    ("typescript", ".ts"),
];

fn to_map(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

pub(super) fn executor_map() -> IndexMap<String, String> {
    to_map(EXECUTOR_MAP)
}

pub(super) fn executor_map_by_file_extension() -> IndexMap<String, String> {
    to_map(EXECUTOR_MAP_BY_FILE_EXTENSION)
}

pub(super) fn executor_map_by_glob() -> IndexMap<String, String> {
    to_map(EXECUTOR_MAP_BY_GLOB)
}

pub(super) fn language_id_to_file_extension_map() -> IndexMap<String, String> {
    to_map(LANGUAGE_ID_TO_FILE_EXTENSION)
}
